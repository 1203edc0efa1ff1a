use std::collections::BTreeSet;

use serde::Serialize;

use super::elements::ElementSet;

/// Word and wrapped-line counters measured when a block is flushed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockStats {
    pub num_words: usize,
    pub num_words_in_anchor_text: usize,
    pub num_words_in_wrapped_lines: usize,
    pub num_wrapped_lines: usize,
}

impl BlockStats {
    /// A block that never wrapped counts all its words on a single line.
    fn normalized(mut self) -> Self {
        if self.num_words_in_wrapped_lines == 0 || self.num_wrapped_lines == 0 {
            self.num_words_in_wrapped_lines = self.num_words;
            self.num_wrapped_lines = 1;
        }
        self
    }
}

/// One unit of content/boilerplate classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub text: String,
    pub rich_text: String,
    pub labels: BTreeSet<String>,
    pub stats: BlockStats,
    pub tag_level: usize,
    pub offset_blocks_start: usize,
    pub offset_blocks_end: usize,
    pub contained_text_elements: ElementSet,
    pub is_content: bool,
    pub css_selector: Option<String>,
}

impl TextBlock {
    pub fn new(text: String, stats: BlockStats, offset: usize, elements: ElementSet) -> Self {
        let rich_text = paragraph(&text);
        TextBlock {
            text,
            rich_text,
            labels: BTreeSet::new(),
            stats: stats.normalized(),
            tag_level: 0,
            offset_blocks_start: offset,
            offset_blocks_end: offset,
            contained_text_elements: elements,
            is_content: false,
            css_selector: None,
        }
    }

    pub fn num_words(&self) -> usize {
        self.stats.num_words
    }

    pub fn num_words_in_anchor_text(&self) -> usize {
        self.stats.num_words_in_anchor_text
    }

    pub fn text_density(&self) -> f64 {
        self.stats.num_words_in_wrapped_lines as f64 / self.stats.num_wrapped_lines.max(1) as f64
    }

    pub fn link_density(&self) -> f64 {
        if self.stats.num_words == 0 {
            0.0
        } else {
            self.stats.num_words_in_anchor_text as f64 / self.stats.num_words as f64
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn add_label(&mut self, label: &str) {
        self.labels.insert(label.to_string());
    }

    pub fn add_labels<'a>(&mut self, labels: impl IntoIterator<Item = &'a String>) {
        self.labels.extend(labels.into_iter().cloned());
    }

    pub fn remove_label(&mut self, label: &str) -> bool {
        self.labels.remove(label)
    }

    /// Returns whether the flag actually changed.
    pub fn set_is_content(&mut self, is_content: bool) -> bool {
        let changed = self.is_content != is_content;
        self.is_content = is_content;
        changed
    }

    /// Absorbs `other`, which directly follows this block in document order.
    pub fn merge_next(&mut self, other: TextBlock) {
        self.text.push('\n');
        self.text.push_str(&other.text);
        self.rich_text.push_str(&other.rich_text);

        self.stats.num_words += other.stats.num_words;
        self.stats.num_words_in_anchor_text += other.stats.num_words_in_anchor_text;
        self.stats.num_words_in_wrapped_lines += other.stats.num_words_in_wrapped_lines;
        self.stats.num_wrapped_lines += other.stats.num_wrapped_lines;
        self.stats = self.stats.normalized();

        self.offset_blocks_start = self.offset_blocks_start.min(other.offset_blocks_start);
        self.offset_blocks_end = self.offset_blocks_end.max(other.offset_blocks_end);
        self.is_content |= other.is_content;
        self.contained_text_elements
            .union_with(&other.contained_text_elements);
        self.labels.extend(other.labels);
        self.tag_level = self.tag_level.min(other.tag_level);
    }
}

fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text))
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Block with `words` words of which `anchor` are linked, on one line.
    pub(crate) fn block(text: &str, words: usize, anchor: usize, offset: usize) -> TextBlock {
        let stats = BlockStats {
            num_words: words,
            num_words_in_anchor_text: anchor,
            num_words_in_wrapped_lines: words,
            num_wrapped_lines: 1,
        };
        let mut elements = ElementSet::new();
        elements.insert(offset);
        TextBlock::new(text.to_string(), stats, offset, elements)
    }

    #[test]
    fn densities() {
        let b = block("a b c d e", 5, 1, 0);
        assert!((b.link_density() - 0.2).abs() < 1e-9);
        assert!((b.text_density() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_word_block_has_zero_link_density_and_one_line() {
        let b = TextBlock::new(String::new(), BlockStats::default(), 0, ElementSet::new());
        assert_eq!(b.link_density(), 0.0);
        assert_eq!(b.stats.num_wrapped_lines, 1);
    }

    #[test]
    fn merge_sums_counters_and_unions_sets() {
        let mut a = block("first", 4, 0, 0);
        a.tag_level = 3;
        a.add_label("A");
        let mut b = block("second", 6, 3, 1);
        b.tag_level = 2;
        b.is_content = true;
        b.add_label("B");

        a.merge_next(b);
        assert_eq!(a.text, "first\nsecond");
        assert_eq!(a.rich_text, "<p>first</p><p>second</p>");
        assert_eq!(a.num_words(), 10);
        assert_eq!(a.num_words_in_anchor_text(), 3);
        assert_eq!(a.tag_level, 2);
        assert!(a.is_content);
        assert!(a.has_label("A") && a.has_label("B"));
        assert_eq!((a.offset_blocks_start, a.offset_blocks_end), (0, 1));
        assert!(a.contained_text_elements.contains(0));
        assert!(a.contained_text_elements.contains(1));
        assert!((a.link_density() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn set_is_content_reports_change() {
        let mut b = block("x", 1, 0, 0);
        assert!(b.set_is_content(true));
        assert!(!b.set_is_content(true));
    }

    #[test]
    fn rich_text_escapes_markup() {
        let b = block("a < b & c", 3, 0, 0);
        assert_eq!(b.rich_text, "<p>a &lt; b &amp; c</p>");
    }
}
