use super::Filter;
use crate::document::{labels, TextBlock, TextDocument};
use crate::error::Result;

/// Folds low-link-density blocks into the content block preceding them,
/// repeating until a pass merges nothing.
#[derive(Debug, Clone, Copy)]
pub struct ContentFusion {
    pub max_link_density: f64,
}

impl ContentFusion {
    pub fn new(max_link_density: f64) -> Self {
        Self { max_link_density }
    }

    fn absorbs(&self, prev: &TextBlock, next: &TextBlock) -> bool {
        prev.is_content
            && next.link_density() < self.max_link_density
            && !next.has_label(labels::STRICTLY_NOT_CONTENT)
    }

    /// One left-to-right pass; returns whether anything merged.
    fn fuse_pass(&self, doc: &mut TextDocument) -> bool {
        let mut fused: Vec<TextBlock> = Vec::with_capacity(doc.blocks.len());
        let mut merged = false;

        for block in std::mem::take(&mut doc.blocks) {
            match fused.last_mut() {
                Some(prev) if self.absorbs(prev, &block) => {
                    prev.merge_next(block);
                    merged = true;
                }
                _ => fused.push(block),
            }
        }
        doc.blocks = fused;
        merged
    }
}

impl Filter for ContentFusion {
    fn name(&self) -> &'static str {
        "ContentFusion"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        if doc.blocks.len() < 2 {
            return Ok(false);
        }
        let mut changed = false;
        while self.fuse_pass(doc) {
            changed = true;
        }
        Ok(changed)
    }
}
