//! Reduces a token stream into text blocks.
//!
//! Character data accumulates in two buffers: the plain text that becomes the
//! block's text, and a token buffer that additionally carries anchor
//! sentinels so word counting can tell linked words apart. Block-level tags
//! flush the buffers into a [`TextBlock`].

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, warn};

use super::category::{normalize_base_url, PageCategorySniffer};
use super::dates::find_date_times;
use super::tag_actions::{TagAction, TagActionMap};
use super::token::{attr, Token};
use super::words::{is_word, tokenize, ANCHOR_TEXT_END, ANCHOR_TEXT_START};
use crate::config::ExtractionConfig;
use crate::document::{labels, BlockStats, ElementSet, TextBlock, TextDocument};

static FONT_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([+-]?)([0-9])$").unwrap());

const BASE_FONT_SIZE: i32 = 3;

/// One open element: its tag and the labels it attaches to enclosed blocks.
#[derive(Debug)]
struct Frame {
    tag: String,
    labels: Vec<&'static str>,
}

/// All mutable state of one document's tokenization.
pub struct BlockBuilder<'a> {
    tag_actions: &'a TagActionMap,
    max_line_length: usize,
    max_block_chars: usize,

    base_url: String,
    page_title: Option<String>,

    text_buffer: String,
    token_buffer: String,
    last_was_whitespace: bool,
    buffer_capped: bool,

    in_body: usize,
    in_anchor: usize,
    in_ignorable: usize,
    in_anchor_text: bool,

    tag_level: usize,
    block_tag_level: Option<usize>,
    frames: Vec<Frame>,
    font_sizes: Vec<Option<i32>>,
    last_start_tag: Option<String>,

    text_element_idx: usize,
    contained: ElementSet,
    offset_blocks: usize,
    blocks: Vec<TextBlock>,

    char_count: usize,
    anchor_count: usize,
    date_time_count: usize,
    first_date: Option<NaiveDateTime>,
    latest_date: Option<NaiveDateTime>,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(base_url: Option<&str>, tag_actions: &'a TagActionMap, config: &ExtractionConfig) -> Self {
        BlockBuilder {
            tag_actions,
            max_line_length: config.max_line_length,
            max_block_chars: config.max_block_chars,
            base_url: normalize_base_url(base_url),
            page_title: None,
            text_buffer: String::new(),
            token_buffer: String::new(),
            last_was_whitespace: false,
            buffer_capped: false,
            in_body: 0,
            in_anchor: 0,
            in_ignorable: 0,
            in_anchor_text: false,
            tag_level: 0,
            block_tag_level: None,
            frames: Vec::new(),
            font_sizes: Vec::new(),
            last_start_tag: None,
            text_element_idx: 0,
            contained: ElementSet::new(),
            offset_blocks: 0,
            blocks: Vec::new(),
            char_count: 0,
            anchor_count: 0,
            date_time_count: 0,
            first_date: None,
            latest_date: None,
        }
    }

    pub fn feed<I: IntoIterator<Item = Token>>(&mut self, tokens: I) {
        for token in tokens {
            self.process(token);
        }
    }

    pub fn process(&mut self, token: Token) {
        match token {
            Token::StartTag { name, attrs } => self.start_tag(&name, &attrs),
            Token::EndTag { name } => self.end_tag(&name),
            Token::Characters(text) => self.characters(&text),
            Token::EndDocument => self.flush_block(),
        }
    }

    /// Flushes what is pending and hands over the finished document.
    pub fn finish(mut self, sniffer: &dyn PageCategorySniffer) -> TextDocument {
        self.flush_block();

        let page_category = sniffer.sniff(&self.base_url, self.char_count, self.anchor_count);
        debug!(
            blocks = self.blocks.len(),
            chars = self.char_count,
            anchors = self.anchor_count,
            category = %page_category,
            "built text document"
        );

        let mut doc = TextDocument::new(self.base_url, self.page_title, self.blocks);
        doc.char_count = self.char_count;
        doc.anchor_count = self.anchor_count;
        doc.date_time_count = self.date_time_count;
        doc.publish_time = self.first_date;
        doc.modified_time = self.latest_date;
        doc.page_category = page_category;
        doc
    }

    fn start_tag(&mut self, name: &str, attrs: &[(String, String)]) {
        let tag = name.to_ascii_lowercase();
        self.frames.push(Frame {
            tag: tag.clone(),
            labels: Vec::new(),
        });

        let action = self.tag_actions.get(&tag);
        if action.map_or(true, |a| a.changes_tag_level()) {
            self.tag_level += 1;
        }
        if action.map_or(true, |a| a.forces_flush()) {
            self.flush_block();
        }
        if let Some(action) = action {
            self.start_action(action, attrs);
        }

        self.last_start_tag = Some(tag);
    }

    fn start_action(&mut self, action: TagAction, attrs: &[(String, String)]) {
        match action {
            TagAction::Ignorable => self.in_ignorable += 1,
            TagAction::InlineNoWhitespace => {}
            TagAction::InlineWhitespace => self.add_whitespace_if_necessary(),
            TagAction::AnchorText => {
                if self.in_anchor == 0 {
                    self.anchor_count += 1;
                    self.push_anchor_sentinel(ANCHOR_TEXT_START);
                }
                self.in_anchor += 1;
            }
            TagAction::Body => self.in_body += 1,
            TagAction::Font => {
                let size = attr(attrs, "size").and_then(|s| self.font_size(s.trim()));
                self.font_sizes.push(size);
            }
            TagAction::LabeledBlock(block_labels) => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.labels.extend_from_slice(block_labels);
                }
            }
        }
    }

    fn end_tag(&mut self, name: &str) {
        let tag = name.to_ascii_lowercase();
        // Unmatched end tags from a sloppy tokenizer are ignored.
        let Some(frame_idx) = self.frames.iter().rposition(|f| f.tag == tag) else {
            return;
        };

        let action = self.tag_actions.get(&tag);
        if action.map_or(true, |a| a.forces_flush()) {
            self.flush_block();
        }
        if let Some(action) = action {
            self.end_action(action);
        }
        if action.map_or(true, |a| a.changes_tag_level()) {
            self.tag_level = self.tag_level.saturating_sub(1);
        }

        self.frames.remove(frame_idx);
    }

    fn end_action(&mut self, action: TagAction) {
        match action {
            TagAction::Ignorable => self.in_ignorable = self.in_ignorable.saturating_sub(1),
            TagAction::InlineNoWhitespace => {}
            TagAction::InlineWhitespace => self.add_whitespace_if_necessary(),
            TagAction::AnchorText => {
                self.in_anchor = self.in_anchor.saturating_sub(1);
                if self.in_anchor == 0 {
                    self.push_anchor_sentinel(ANCHOR_TEXT_END);
                }
            }
            TagAction::Body => self.in_body = self.in_body.saturating_sub(1),
            TagAction::Font => {
                self.font_sizes.pop();
            }
            TagAction::LabeledBlock(_) => {}
        }
    }

    fn characters(&mut self, text: &str) {
        self.text_element_idx += 1;

        if self.in_ignorable > 0 || text.is_empty() {
            return;
        }

        let starts_with_ws = text.starts_with(char::is_whitespace);
        let ends_with_ws = text.ends_with(char::is_whitespace);
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.is_empty() {
            self.add_whitespace_if_necessary();
            return;
        }

        if starts_with_ws {
            self.add_whitespace_if_necessary();
        }
        if self.block_tag_level.is_none() {
            self.block_tag_level = Some(self.tag_level);
        }

        self.push_text(&collapsed);
        if ends_with_ws {
            self.push_text(" ");
        }
        self.last_was_whitespace = ends_with_ws;

        self.char_count += collapsed.chars().count();
        self.contained.insert(self.text_element_idx);
    }

    /// Appends to both buffers, stopping at `max_block_chars` of text.
    fn push_text(&mut self, text: &str) {
        let room = self.max_block_chars.saturating_sub(self.text_buffer.len());
        if text.len() <= room {
            self.text_buffer.push_str(text);
            self.token_buffer.push_str(text);
            return;
        }

        if !self.buffer_capped {
            warn!(limit = self.max_block_chars, "block text exceeds limit, truncating");
            self.buffer_capped = true;
        }
        let mut cut = room;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        self.text_buffer.push_str(&text[..cut]);
        self.token_buffer.push_str(&text[..cut]);
    }

    fn add_whitespace_if_necessary(&mut self) {
        if !self.last_was_whitespace {
            self.push_text(" ");
            self.last_was_whitespace = true;
        }
    }

    /// Marks an anchor boundary for word counting. A capped buffer takes no
    /// more sentinels; `measure` resyncs the anchor state instead.
    fn push_anchor_sentinel(&mut self, sentinel: &str) {
        self.add_whitespace_if_necessary();
        if self.buffer_capped {
            return;
        }
        self.token_buffer.push_str(sentinel);
        self.token_buffer.push(' ');
        self.last_was_whitespace = true;
    }

    fn font_size(&self, raw: &str) -> Option<i32> {
        let caps = FONT_SIZE_RE.captures(raw)?;
        let val: i32 = caps[2].parse().ok()?;
        let size = match &caps[1] {
            "" => val,
            rel => {
                let prev = self
                    .font_sizes
                    .iter()
                    .rev()
                    .flatten()
                    .next()
                    .copied()
                    .unwrap_or(BASE_FONT_SIZE);
                if rel == "+" {
                    prev + val
                } else {
                    prev - val
                }
            }
        };
        Some(size)
    }

    fn reset_buffers(&mut self) {
        self.text_buffer.clear();
        self.token_buffer.clear();
        self.block_tag_level = None;
        self.buffer_capped = false;
    }

    fn flush_block(&mut self) {
        if self.in_body == 0 {
            if self.last_start_tag.as_deref() == Some("title") && self.page_title.is_none() {
                let candidate = self.text_buffer.trim();
                if !candidate.is_empty() {
                    self.page_title = Some(candidate.to_string());
                }
            }
            self.reset_buffers();
            self.contained = ElementSet::new();
            return;
        }

        if self.token_buffer.trim().is_empty() {
            self.reset_buffers();
            return;
        }

        let Some(stats) = self.measure() else {
            self.reset_buffers();
            return;
        };

        let text = self.text_buffer.trim().to_string();
        let found = find_date_times(&text);
        self.date_time_count += found.len();
        for date in found {
            self.first_date.get_or_insert(date);
            if self.latest_date.map_or(true, |latest| date > latest) {
                self.latest_date = Some(date);
            }
        }

        let mut block = TextBlock::new(
            text,
            stats,
            self.offset_blocks,
            std::mem::take(&mut self.contained),
        );
        block.tag_level = self.block_tag_level.unwrap_or(self.tag_level);
        block.css_selector = self.last_start_tag.clone();
        if let Some(size) = self.font_sizes.iter().rev().flatten().next() {
            block.add_label(&labels::font_size(*size));
        }
        for frame in &self.frames {
            for label in &frame.labels {
                block.add_label(label);
            }
        }

        self.offset_blocks += 1;
        self.blocks.push(block);
        self.reset_buffers();
    }

    fn measure(&mut self) -> Option<BlockStats> {
        let tokens = tokenize(&self.token_buffer);
        let stats = measure_tokens(&tokens, self.max_line_length, &mut self.in_anchor_text);
        if self.buffer_capped {
            self.in_anchor_text = self.in_anchor > 0;
        }
        stats
    }
}

/// Counts words, anchor words and wrapped lines of a token sequence.
///
/// `in_anchor_text` carries anchor context across blocks, since a flush may
/// happen inside a link. `None` when there is nothing but anchor sentinels.
fn measure_tokens(
    tokens: &[String],
    max_line_length: usize,
    in_anchor_text: &mut bool,
) -> Option<BlockStats> {
    let mut num_tokens = 0usize;
    let mut num_words = 0usize;
    let mut num_linked_words = 0usize;
    let mut num_wrapped_lines = 0usize;
    let mut num_words_current_line = 0usize;
    // The first token has no leading space.
    let mut current_line_length: isize = -1;
    let max_line_length = max_line_length as isize;

    for token in tokens {
        if token == ANCHOR_TEXT_START {
            *in_anchor_text = true;
        } else if token == ANCHOR_TEXT_END {
            *in_anchor_text = false;
        } else if is_word(token) {
            num_tokens += 1;
            num_words += 1;
            num_words_current_line += 1;
            if *in_anchor_text {
                num_linked_words += 1;
            }
            let token_length = token.chars().count() as isize;
            current_line_length += token_length + 1;
            if current_line_length > max_line_length {
                num_wrapped_lines += 1;
                current_line_length = token_length;
                num_words_current_line = 1;
            }
        } else {
            num_tokens += 1;
        }
    }

    if num_tokens == 0 {
        return None;
    }

    let (num_words_in_wrapped_lines, num_wrapped_lines) = if num_wrapped_lines == 0 {
        (num_words, 1)
    } else {
        (num_words - num_words_current_line, num_wrapped_lines)
    };

    Some(BlockStats {
        num_words,
        num_words_in_anchor_text: num_linked_words,
        num_words_in_wrapped_lines,
        num_wrapped_lines,
    })
}

/// Word and line counters of plain text with no anchor information.
pub fn text_stats(text: &str, max_line_length: usize) -> BlockStats {
    let mut in_anchor_text = false;
    measure_tokens(&tokenize(text), max_line_length, &mut in_anchor_text).unwrap_or_default()
}

/// Runs a whole token stream through a fresh builder.
pub fn build_document<I: IntoIterator<Item = Token>>(
    tokens: I,
    base_url: Option<&str>,
    tag_actions: &TagActionMap,
    config: &ExtractionConfig,
    sniffer: &dyn PageCategorySniffer,
) -> TextDocument {
    let mut builder = BlockBuilder::new(base_url, tag_actions, config);
    builder.feed(tokens);
    builder.finish(sniffer)
}
