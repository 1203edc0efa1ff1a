use std::sync::LazyLock;

use regex::Regex;

/// Sentinels written into the token buffer around anchor text.
pub const ANCHOR_TEXT_START: &str = "$\u{e00a}<";
pub const ANCHOR_TEXT_END: &str = ">\u{e00a}$";

const INVISIBLE_SEPARATOR: &str = "\u{2063}";

static WORD_BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b").unwrap());
static GLUED_PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{2063}*([\"'.,!@\\-:;$?()/])\u{2063}*").unwrap());
static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[ \u{2063}]+").unwrap());
static WORD_CHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{Nd}\p{Nl}\p{No}]").unwrap());

/// Splits text at word boundaries, keeping punctuation attached to its
/// neighbours so that "e.g." or "don't" stay single tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let marked = WORD_BOUNDARY_RE.replace_all(text, INVISIBLE_SEPARATOR);
    let glued = GLUED_PUNCTUATION_RE.replace_all(&marked, "${1}");
    let spaced = SEPARATOR_RUN_RE.replace_all(&glued, " ");
    spaced
        .trim()
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A token is a word iff it has at least one letter or number.
pub fn is_word(token: &str) -> bool {
    WORD_CHAR_RE.is_match(token)
}
