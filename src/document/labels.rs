//! Label strings attached to blocks by the tag action table and by filters.

pub const TITLE: &str = "TITLE";
pub const HEADING: &str = "HEADING";
pub const H1: &str = "H1";
pub const H2: &str = "H2";
pub const H3: &str = "H3";
pub const LI: &str = "LI";

pub const INDICATES_END_OF_TEXT: &str = "INDICATES_END_OF_TEXT";
pub const STRICTLY_NOT_CONTENT: &str = "STRICTLY_NOT_CONTENT";
pub const VERY_LIKELY_CONTENT: &str = "VERY_LIKELY_CONTENT";
pub const MIGHT_BE_CONTENT: &str = "MIGHT_BE_CONTENT";

pub const TOO_MANY_DATE_STRING_CONTENT: &str = "TOO_MANY_DATE_STRING_CONTENT";
/// Blocks beyond the per-document size guard.
pub const TRUNCATED: &str = "TRUNCATED";

pub fn font_size(size: i32) -> String {
    format!("font-{}", size)
}
