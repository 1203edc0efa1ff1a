use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

static DATE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{4})[-/.年](\d{1,2})[-/.月](\d{1,2})日?(?:[T ]?\s*(\d{1,2}):(\d{2})(?::(\d{2}))?)?",
    )
    .unwrap()
});

/// All calendar-valid date/time strings in `text`, in order of appearance.
pub fn find_date_times(text: &str) -> Vec<NaiveDateTime> {
    DATE_TIME_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
            let date = NaiveDate::from_ymd_opt(num(1)? as i32, num(2)?, num(3)?)?;
            date.and_hms_opt(num(4).unwrap_or(0), num(5).unwrap_or(0), num(6).unwrap_or(0))
        })
        .collect()
}
