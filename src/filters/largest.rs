use super::Filter;
use crate::document::{labels, TextDocument};
use crate::error::Result;

/// Keeps only the largest content block, optionally re-admitting large
/// blocks around it that sit at the same nesting level.
///
/// The winner is labeled `VERY_LIKELY_CONTENT`, every other block
/// `MIGHT_BE_CONTENT`.
#[derive(Debug, Clone, Copy)]
pub struct KeepLargestBlockFilter {
    pub expand_to_same_level_text: bool,
    pub min_words: usize,
}

impl KeepLargestBlockFilter {
    pub fn new(expand_to_same_level_text: bool, min_words: usize) -> Self {
        Self {
            expand_to_same_level_text,
            min_words,
        }
    }

    fn expand(&self, doc: &mut TextDocument, largest: usize) {
        let level = doc.blocks[largest].tag_level;
        let admit = |i: usize, doc: &mut TextDocument| -> bool {
            let block = &mut doc.blocks[i];
            if block.tag_level < level {
                return false;
            }
            if block.tag_level == level && block.num_words() >= self.min_words {
                block.set_is_content(true);
            }
            true
        };

        for i in (0..largest).rev() {
            if !admit(i, doc) {
                break;
            }
        }
        for i in largest + 1..doc.blocks.len() {
            if !admit(i, doc) {
                break;
            }
        }
    }
}

impl Filter for KeepLargestBlockFilter {
    fn name(&self) -> &'static str {
        "KeepLargestBlockFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        if doc.blocks.len() < 2 {
            return Ok(false);
        }

        // First maximum wins ties.
        let mut largest: Option<(usize, usize)> = None;
        for (i, block) in doc.blocks.iter().enumerate().filter(|(_, b)| b.is_content) {
            if largest.map_or(true, |(_, words)| block.num_words() > words) {
                largest = Some((i, block.num_words()));
            }
        }
        let Some((largest, _)) = largest else {
            return Ok(false);
        };

        for (i, block) in doc.blocks.iter_mut().enumerate() {
            if i == largest {
                block.set_is_content(true);
                block.add_label(labels::VERY_LIKELY_CONTENT);
            } else {
                block.set_is_content(false);
                block.add_label(labels::MIGHT_BE_CONTENT);
            }
        }

        if self.expand_to_same_level_text {
            self.expand(doc, largest);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{content, doc, flags};

    fn at_level(mut b: crate::document::TextBlock, level: usize) -> crate::document::TextBlock {
        b.tag_level = level;
        b
    }

    #[test]
    fn keeps_largest_and_labels_the_rest() {
        let mut d = doc(vec![
            content("teaser", 20, 0),
            content("article", 120, 1),
            content("footer", 30, 2),
        ]);
        assert!(KeepLargestBlockFilter::new(false, 150).process(&mut d).unwrap());
        assert_eq!(flags(&d), vec![false, true, false]);
        assert!(d.blocks[1].has_label(labels::VERY_LIKELY_CONTENT));
        assert!(d.blocks[0].has_label(labels::MIGHT_BE_CONTENT));
        assert!(d.blocks[2].has_label(labels::MIGHT_BE_CONTENT));
    }

    #[test]
    fn expansion_readmits_large_siblings_until_shallower_block() {
        let mut d = doc(vec![
            at_level(content("other page part", 160, 0), 3),
            at_level(content("wrapper", 2, 1), 2),
            at_level(content("part one", 170, 2), 3),
            at_level(content("part two", 300, 3), 3),
            at_level(content("deep quote", 5, 4), 4),
            at_level(content("part three", 155, 5), 3),
        ]);
        assert!(KeepLargestBlockFilter::new(true, 150).process(&mut d).unwrap());
        assert_eq!(flags(&d), vec![false, false, true, true, false, true]);
    }

    #[test]
    fn no_content_means_no_change() {
        let mut d = doc(vec![
            crate::filters::test_support::block("a", 1, 0, 0),
            crate::filters::test_support::block("b", 1, 0, 1),
        ]);
        assert!(!KeepLargestBlockFilter::new(true, 150).process(&mut d).unwrap());
    }
}
