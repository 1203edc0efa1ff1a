use super::Filter;
use crate::document::{labels, TextDocument};
use crate::error::Result;

/// Drops everything from the first end-of-text marker on, once enough
/// dense content has been seen before it.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreBlocksAfterContentFilter {
    pub min_num_words: usize,
    /// Only content blocks at least this dense count towards `min_num_words`.
    pub min_text_density: f64,
}

impl IgnoreBlocksAfterContentFilter {
    pub fn new(min_num_words: usize, min_text_density: f64) -> Self {
        Self {
            min_num_words,
            min_text_density,
        }
    }
}

impl Filter for IgnoreBlocksAfterContentFilter {
    fn name(&self) -> &'static str {
        "IgnoreBlocksAfterContentFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let mut changed = false;
        let mut num_words = 0;
        let mut found_end = false;

        for block in doc.blocks.iter_mut() {
            if block.is_content && block.text_density() >= self.min_text_density {
                num_words += block.num_words();
            }
            if !found_end
                && block.has_label(labels::INDICATES_END_OF_TEXT)
                && num_words >= self.min_num_words
            {
                found_end = true;
            }
            if found_end {
                changed |= block.set_is_content(false);
            }
        }
        Ok(changed)
    }
}

/// Walks backwards demoting end-of-text blocks until enough content words
/// have been passed.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreBlocksAfterContentFromEndFilter {
    pub max_words_from_end: usize,
}

impl IgnoreBlocksAfterContentFromEndFilter {
    pub fn new(max_words_from_end: usize) -> Self {
        Self { max_words_from_end }
    }
}

impl Filter for IgnoreBlocksAfterContentFromEndFilter {
    fn name(&self) -> &'static str {
        "IgnoreBlocksAfterContentFromEndFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let mut changed = false;
        let mut words = 0;

        for block in doc.blocks.iter_mut().rev() {
            if block.has_label(labels::INDICATES_END_OF_TEXT) {
                block.add_label(labels::STRICTLY_NOT_CONTENT);
                block.remove_label(labels::MIGHT_BE_CONTENT);
                block.set_is_content(false);
                changed = true;
            } else if block.is_content {
                words += block.num_words();
                if words > self.max_words_from_end {
                    break;
                }
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{block, content, doc, flags};

    fn end_marker(offset: usize) -> crate::document::TextBlock {
        let mut b = content("Post a comment", 3, offset);
        b.add_label(labels::INDICATES_END_OF_TEXT);
        b
    }

    #[test]
    fn drops_tail_after_enough_content() {
        let mut d = doc(vec![
            content("body", 40, 0),
            content("more body", 30, 1),
            end_marker(2),
            content("reader comment", 20, 3),
        ]);
        let filter = IgnoreBlocksAfterContentFilter::new(60, 9.0);
        assert!(filter.process(&mut d).unwrap());
        assert_eq!(flags(&d), vec![true, true, false, false]);
    }

    #[test]
    fn marker_before_enough_content_is_ignored() {
        let mut d = doc(vec![
            content("teaser", 10, 0),
            end_marker(1),
            content("body", 40, 2),
        ]);
        let filter = IgnoreBlocksAfterContentFilter::new(60, 9.0);
        assert!(!filter.process(&mut d).unwrap());
        assert_eq!(flags(&d), vec![true, true, true]);
    }

    #[test]
    fn sparse_blocks_do_not_count() {
        let mut sparse = content("menu", 70, 0);
        sparse.stats.num_wrapped_lines = 70;
        let mut d = doc(vec![sparse, end_marker(1), content("after", 10, 2)]);
        let filter = IgnoreBlocksAfterContentFilter::new(60, 9.0);
        assert!(!filter.process(&mut d).unwrap());
    }

    #[test]
    fn from_end_demotes_trailing_markers() {
        let mut marker = end_marker(2);
        marker.add_label(labels::MIGHT_BE_CONTENT);
        let mut d = doc(vec![content("body", 50, 0), block("nav", 2, 2, 1), marker]);

        let filter = IgnoreBlocksAfterContentFromEndFilter::new(200);
        assert!(filter.process(&mut d).unwrap());
        let last = &d.blocks[2];
        assert!(!last.is_content);
        assert!(last.has_label(labels::STRICTLY_NOT_CONTENT));
        assert!(!last.has_label(labels::MIGHT_BE_CONTENT));
        assert!(d.blocks[0].is_content);
    }

    #[test]
    fn from_end_stops_after_word_budget() {
        let mut d = doc(vec![end_marker(0), content("long tail", 250, 1)]);
        let filter = IgnoreBlocksAfterContentFromEndFilter::new(200);
        assert!(!filter.process(&mut d).unwrap());
        assert!(d.blocks[0].is_content);
    }
}
