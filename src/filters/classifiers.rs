//! Initial classification: end-of-text markers, title blocks and the
//! word-count decision tree that first assigns `is_content`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::Filter;
use crate::document::{labels, TextDocument};
use crate::error::Result;

/// Classifies each block from its own and its neighbours' word counts and
/// link densities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumWordsRulesClassifier;

impl NumWordsRulesClassifier {
    fn classify(prev: (usize, f64), curr: (usize, f64), next_words: usize) -> bool {
        let (prev_words, prev_ld) = prev;
        let (curr_words, curr_ld) = curr;
        if curr_ld > 0.333333 {
            return false;
        }
        if prev_ld <= 0.555556 {
            curr_words > 16 || next_words > 15 || prev_words > 4
        } else {
            curr_words > 40 || next_words > 17
        }
    }
}

impl Filter for NumWordsRulesClassifier {
    fn name(&self) -> &'static str {
        "NumWordsRulesClassifier"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let features: Vec<(usize, f64)> = doc
            .blocks
            .iter()
            .map(|b| (b.num_words(), b.link_density()))
            .collect();

        let mut changed = false;
        for (i, block) in doc.blocks.iter_mut().enumerate() {
            let prev = if i == 0 { (0, 0.0) } else { features[i - 1] };
            let next_words = features.get(i + 1).map_or(0, |f| f.0);
            changed |= block.set_is_content(Self::classify(prev, features[i], next_words));
        }
        Ok(changed)
    }
}

static LEADING_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+ (comments|users responded in)").unwrap());

const END_PREFIXES: &[&str] = &["comments", "© reuters", "please rate this", "post a comment"];
const END_FRAGMENTS: &[&str] = &[
    "what you think...",
    "add your comment",
    "add comment",
    "reader views",
    "have your say",
    "reader comments",
    "rätta artikeln",
    "责任编辑",
    "相关阅读",
    "相关新闻",
    "版权声明",
];

/// Labels short blocks that typically close an article (comment prompts,
/// copyright lines) with `INDICATES_END_OF_TEXT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminatingBlocksFinder;

impl TerminatingBlocksFinder {
    fn is_terminating(text: &str, link_density: f64) -> bool {
        let text = text.trim();
        if text.chars().count() < 8 {
            return link_density == 1.0 && text == "Comment";
        }
        let lower = text.to_lowercase();
        END_PREFIXES.iter().any(|p| lower.starts_with(p))
            || LEADING_COUNT_RE.is_match(&lower)
            || END_FRAGMENTS.iter().any(|f| lower.contains(f))
            || lower == "thanks for your comments - this feedback is now closed"
    }
}

impl Filter for TerminatingBlocksFinder {
    fn name(&self) -> &'static str {
        "TerminatingBlocksFinder"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let mut changed = false;
        for block in doc.blocks.iter_mut() {
            if block.num_words() >= 15 {
                continue;
            }
            if Self::is_terminating(&block.text, block.link_density()) {
                block.add_label(labels::INDICATES_END_OF_TEXT);
                changed = true;
            }
        }
        Ok(changed)
    }
}

static TITLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:[|»:–—_]|\s-\s)\s*").unwrap());
static TRAILING_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?!.\-:]+$").unwrap());

/// Minimum words for a title fragment to be matched on its own.
const MIN_TITLE_PART_WORDS: usize = 4;

/// Labels blocks repeating the page title with `TITLE` and records the first
/// one as the document's content title.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTitleMatchClassifier;

fn normalize_title(s: &str) -> String {
    s.replace('\u{a0}', " ")
        .replace('\'', "")
        .trim()
        .to_lowercase()
}

impl DocumentTitleMatchClassifier {
    /// The full title plus its site-name-free fragments.
    fn potential_titles(page_title: &str) -> HashSet<String> {
        let title = normalize_title(page_title);
        let mut titles = HashSet::new();
        if title.is_empty() {
            return titles;
        }

        let parts: Vec<&str> = TITLE_SEPARATOR_RE
            .split(&title)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() > 1 {
            if let Some(longest) = parts.iter().max_by_key(|p| p.split_whitespace().count()) {
                titles.insert(longest.to_string());
            }
            let joined = [parts[..parts.len() - 1].join(" "), parts[1..].join(" ")];
            let candidates = parts.iter().map(|p| p.to_string()).chain(joined);
            titles.extend(
                candidates.filter(|p| p.split_whitespace().count() >= MIN_TITLE_PART_WORDS),
            );
        }
        titles.insert(title);
        titles
    }
}

impl Filter for DocumentTitleMatchClassifier {
    fn name(&self) -> &'static str {
        "DocumentTitleMatchClassifier"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let Some(page_title) = doc.page_title.as_deref() else {
            return Ok(false);
        };
        let titles = Self::potential_titles(page_title);
        if titles.is_empty() {
            return Ok(false);
        }

        let mut changed = false;
        let mut first_match = None;
        for block in doc.blocks.iter_mut() {
            let text = normalize_title(&block.text);
            let stripped = TRAILING_PUNCT_RE.replace(&text, "");
            if titles.contains(&text) || titles.contains(&*stripped) {
                block.add_label(labels::TITLE);
                first_match.get_or_insert_with(|| block.text.clone());
                changed = true;
            }
        }
        if doc.content_title.is_none() {
            doc.content_title = first_match;
        }
        Ok(changed)
    }
}
