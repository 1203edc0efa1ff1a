use tracing::info;

use super::Filter;
use crate::document::text_document::describe;
use crate::document::TextDocument;
use crate::error::Result;

/// Logs every block at info level. Never modifies the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintDebugFilter;

impl Filter for PrintDebugFilter {
    fn name(&self) -> &'static str {
        "PrintDebugFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        info!(
            url = %doc.base_url,
            category = %doc.page_category,
            blocks = doc.blocks.len(),
            "document"
        );
        for (i, block) in doc.blocks.iter().enumerate() {
            info!("{}", describe(i, block));
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{content, doc};

    #[test]
    fn never_reports_change() {
        let mut d = doc(vec![content("a", 3, 0)]);
        let before = d.clone();
        assert!(!PrintDebugFilter.process(&mut d).unwrap());
        assert_eq!(d, before);
    }
}
