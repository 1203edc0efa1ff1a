use std::sync::LazyLock;

use regex::Regex;

use super::Filter;
use crate::document::{TextBlock, TextDocument};
use crate::error::Result;
use crate::parser::builder::text_stats;

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n\r]+").unwrap());

/// Splits every multi-line block into one block per non-empty line.
///
/// Child blocks are re-measured from their own text. Anchor words cannot be
/// attributed to a line after the fact, so children report none.
#[derive(Debug, Clone, Copy)]
pub struct SplitParagraphBlocksFilter {
    pub max_line_length: usize,
}

impl SplitParagraphBlocksFilter {
    pub fn new(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    fn split(&self, block: TextBlock) -> Vec<TextBlock> {
        let parts: Vec<&str> = LINE_BREAK_RE
            .split(&block.text)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() < 2 {
            return vec![block];
        }

        parts
            .into_iter()
            .map(|part| {
                let mut child = TextBlock::new(
                    part.to_string(),
                    text_stats(part, self.max_line_length),
                    block.offset_blocks_start,
                    block.contained_text_elements.clone(),
                );
                child.offset_blocks_end = block.offset_blocks_end;
                child.is_content = block.is_content;
                child.labels = block.labels.clone();
                child.tag_level = block.tag_level;
                child.css_selector = block.css_selector.clone();
                child
            })
            .collect()
    }
}

impl Filter for SplitParagraphBlocksFilter {
    fn name(&self) -> &'static str {
        "SplitParagraphBlocksFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let before = doc.blocks.len();
        let blocks = std::mem::take(&mut doc.blocks);
        doc.blocks = blocks.into_iter().flat_map(|b| self.split(b)).collect();
        Ok(doc.blocks.len() != before)
    }
}
