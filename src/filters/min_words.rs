use std::sync::LazyLock;

use regex::Regex;

use super::Filter;
use crate::document::TextDocument;
use crate::error::Result;

/// Demotes content blocks with fewer than `min_words` words.
#[derive(Debug, Clone, Copy)]
pub struct MinWordsFilter {
    pub min_words: usize,
}

impl MinWordsFilter {
    pub fn new(min_words: usize) -> Self {
        Self { min_words }
    }
}

impl Filter for MinWordsFilter {
    fn name(&self) -> &'static str {
        "MinWordsFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let mut changed = false;
        for block in doc.blocks.iter_mut().filter(|b| b.is_content) {
            if block.num_words() < self.min_words {
                changed |= block.set_is_content(false);
            }
        }
        Ok(changed)
    }
}

static CLAUSE_DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[,.:;!?]+(?:\s+|\z)").unwrap());
static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Demotes content blocks that contain no clause of at least
/// `min_words` words.
#[derive(Debug, Clone, Copy)]
pub struct MinClauseWordsFilter {
    pub min_words: usize,
    /// Also test the text after the last delimiter.
    pub accept_clauses_without_delimiter: bool,
}

impl MinClauseWordsFilter {
    pub fn new(min_words: usize, accept_clauses_without_delimiter: bool) -> Self {
        Self {
            min_words,
            accept_clauses_without_delimiter,
        }
    }

    fn is_clause(&self, segment: &str) -> bool {
        let words = 1 + WHITESPACE_RUN_RE.find_iter(segment).count();
        words >= self.min_words
    }

    fn has_clause(&self, text: &str) -> bool {
        let mut start = 0;
        for m in CLAUSE_DELIMITER_RE.find_iter(text) {
            // Keep the first delimiter char with its clause.
            let end = (m.start() + 1).min(text.len());
            if self.is_clause(&text[start..end]) {
                return true;
            }
            start = m.end();
        }
        self.accept_clauses_without_delimiter
            && start < text.len()
            && self.is_clause(&text[start..])
    }
}

impl Filter for MinClauseWordsFilter {
    fn name(&self) -> &'static str {
        "MinClauseWordsFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let mut changed = false;
        for block in doc.blocks.iter_mut().filter(|b| b.is_content) {
            if !self.has_clause(&block.text) {
                changed |= block.set_is_content(false);
            }
        }
        Ok(changed)
    }
}
