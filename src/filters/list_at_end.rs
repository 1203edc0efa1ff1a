use super::Filter;
use crate::document::{labels, TextDocument};
use crate::error::Result;

/// Re-admits link-free list items nested below the main content block.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListAtEndFilter;

impl Filter for ListAtEndFilter {
    fn name(&self) -> &'static str {
        "ListAtEndFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let mut changed = false;
        let mut tag_level = usize::MAX;

        for block in doc.blocks.iter_mut() {
            if block.is_content && block.has_label(labels::VERY_LIKELY_CONTENT) {
                tag_level = block.tag_level;
            } else if block.tag_level > tag_level
                && block.has_label(labels::MIGHT_BE_CONTENT)
                && block.has_label(labels::LI)
                && block.link_density() == 0.0
            {
                changed |= block.set_is_content(true);
            } else {
                tag_level = usize::MAX;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextBlock;
    use crate::filters::test_support::{block, content, doc, flags};

    fn item(text: &str, anchor: usize, level: usize, offset: usize) -> TextBlock {
        let mut b = block(text, 4, anchor, offset);
        b.tag_level = level;
        b.add_label(labels::MIGHT_BE_CONTENT);
        b.add_label(labels::LI);
        b
    }

    #[test]
    fn readmits_plain_items_after_main_block() {
        let mut main = content("main", 200, 0);
        main.tag_level = 2;
        main.add_label(labels::VERY_LIKELY_CONTENT);
        let mut d = doc(vec![
            main,
            item("step one", 0, 3, 1),
            item("step two", 0, 3, 2),
            item("linked", 2, 3, 3),
            item("after reset", 0, 3, 4),
        ]);

        assert!(ListAtEndFilter.process(&mut d).unwrap());
        assert_eq!(flags(&d), vec![true, true, true, false, false]);
    }

    #[test]
    fn items_at_same_level_are_not_readmitted() {
        let mut main = content("main", 200, 0);
        main.tag_level = 3;
        main.add_label(labels::VERY_LIKELY_CONTENT);
        let mut d = doc(vec![main, item("sibling", 0, 3, 1)]);
        assert!(!ListAtEndFilter.process(&mut d).unwrap());
    }
}
