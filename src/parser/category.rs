use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::document::PageCategory;

static INDEX_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(index|list|lists|tag|tags|category|categories|channel|search|archive)(/|\.|$)")
        .unwrap()
});
static DETAIL_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(/(detail|item|article|articles|news|post|posts|blog|story)/.+|/\d{5,}[^/]*$|\d{6,}\.s?html?$)")
        .unwrap()
});

/// Minimum characters per anchor before a page reads as prose.
const MIN_CHARS_PER_ANCHOR: usize = 15;
const DETAIL_MIN_CHARS: usize = 1500;

/// Classifies a page from its URL and the text/link counts seen while building.
pub trait PageCategorySniffer: Send + Sync {
    fn sniff(&self, base_url: &str, char_count: usize, anchor_count: usize) -> PageCategory;
}

/// URL-shape rules first, then the character-to-anchor ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSniffer;

impl PageCategorySniffer for HeuristicSniffer {
    fn sniff(&self, base_url: &str, char_count: usize, anchor_count: usize) -> PageCategory {
        if let Some(category) = sniff_url(base_url) {
            return category;
        }
        let anchors = anchor_count.max(1);
        if char_count / anchors < MIN_CHARS_PER_ANCHOR {
            PageCategory::Index
        } else if char_count > DETAIL_MIN_CHARS {
            PageCategory::Detail
        } else {
            PageCategory::Unknown
        }
    }
}

fn sniff_url(base_url: &str) -> Option<PageCategory> {
    let url = Url::parse(base_url).ok()?;
    let path = url.path();
    if path == "/" || path.is_empty() {
        return Some(PageCategory::Index);
    }
    if DETAIL_PATH_RE.is_match(path) {
        return Some(PageCategory::Detail);
    }
    if path.ends_with('/') || INDEX_PATH_RE.is_match(path) {
        return Some(PageCategory::Index);
    }
    None
}

/// Parses `raw` as an absolute URL; anything unparsable becomes "".
pub fn normalize_base_url(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .and_then(|s| Url::parse(s).ok())
        .map(|u| u.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_shapes() {
        let s = HeuristicSniffer;
        assert_eq!(s.sniff("https://example.com/", 5000, 1), PageCategory::Index);
        assert_eq!(s.sniff("https://example.com/news/2024/some-story", 10, 100), PageCategory::Detail);
        assert_eq!(s.sniff("https://example.com/tags/rust", 5000, 1), PageCategory::Index);
        assert_eq!(s.sniff("https://example.com/p/1234567.html", 10, 100), PageCategory::Detail);
    }

    #[test]
    fn falls_back_to_link_ratio() {
        let s = HeuristicSniffer;
        assert_eq!(s.sniff("", 300, 40), PageCategory::Index);
        assert_eq!(s.sniff("", 4000, 10), PageCategory::Detail);
        assert_eq!(s.sniff("https://example.com/about-us", 800, 2), PageCategory::Unknown);
    }

    #[test]
    fn malformed_base_url_degrades_to_empty() {
        assert_eq!(normalize_base_url(None), "");
        assert_eq!(normalize_base_url(Some("not a url")), "");
        assert_eq!(normalize_base_url(Some(" https://example.com/a ")), "https://example.com/a");
    }
}
