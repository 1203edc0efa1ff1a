use super::Filter;
use crate::document::TextDocument;
use crate::error::Result;

/// Removes non-content blocks, keeping any that carry `label_to_keep`.
#[derive(Debug, Clone, Default)]
pub struct BoilerplateBlockFilter {
    pub label_to_keep: Option<String>,
}

impl BoilerplateBlockFilter {
    pub fn new(label_to_keep: Option<&str>) -> Self {
        Self {
            label_to_keep: label_to_keep.map(str::to_string),
        }
    }
}

impl Filter for BoilerplateBlockFilter {
    fn name(&self) -> &'static str {
        "BoilerplateBlockFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let before = doc.blocks.len();
        let keep = self.label_to_keep.as_deref();
        doc.blocks
            .retain(|b| b.is_content || keep.is_some_and(|label| b.has_label(label)));
        Ok(doc.blocks.len() != before)
    }
}

/// Flips every block's content flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvertedFilter;

impl Filter for InvertedFilter {
    fn name(&self) -> &'static str {
        "InvertedFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        for block in doc.blocks.iter_mut() {
            block.is_content = !block.is_content;
        }
        Ok(!doc.blocks.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::labels;
    use crate::filters::test_support::{block, content, doc, flags};

    #[test]
    fn removes_boilerplate_and_is_idempotent() {
        let mut d = doc(vec![content("a", 10, 0), block("nav", 2, 2, 1), content("b", 10, 2)]);
        let filter = BoilerplateBlockFilter::default();
        assert!(filter.process(&mut d).unwrap());
        assert_eq!(d.blocks.len(), 2);

        let once = d.clone();
        assert!(!filter.process(&mut d).unwrap());
        assert_eq!(d, once);
    }

    #[test]
    fn keeps_labeled_blocks() {
        let mut title = block("Title", 1, 0, 0);
        title.add_label(labels::TITLE);
        let mut d = doc(vec![title, block("nav", 2, 2, 1), content("body", 10, 2)]);
        BoilerplateBlockFilter::new(Some(labels::TITLE))
            .process(&mut d)
            .unwrap();
        let texts: Vec<_> = d.blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Title", "body"]);
    }

    #[test]
    fn inverted_twice_restores_flags() {
        let mut d = doc(vec![content("a", 10, 0), block("nav", 2, 2, 1)]);
        assert!(InvertedFilter.process(&mut d).unwrap());
        assert_eq!(flags(&d), vec![false, true]);
        InvertedFilter.process(&mut d).unwrap();
        assert_eq!(flags(&d), vec![true, false]);
    }
}
