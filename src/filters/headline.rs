use super::Filter;
use crate::document::{labels, TextDocument};
use crate::error::Result;

/// Demotes headings that end the content, since nothing follows them.
///
/// Fused blocks carry the labels of all their parts, so a heading folded
/// into the last content block demotes that whole block.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingHeadlineToBoilerplateFilter;

impl Filter for TrailingHeadlineToBoilerplateFilter {
    fn name(&self) -> &'static str {
        "TrailingHeadlineToBoilerplateFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let mut changed = false;
        for block in doc.blocks.iter_mut().rev().filter(|b| b.is_content) {
            if !block.has_label(labels::HEADING) {
                break;
            }
            block.set_is_content(false);
            changed = true;
        }
        Ok(changed)
    }
}
