//! Date normalization to ISO `YYYY-MM-DD`.

use regex::Captures;

use super::patterns::{DATE_DMY, DATE_YMD};

/// A billing or consumption interval as ISO strings, empty when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Build a range from two day-first captured triples (groups 1-3 and 4-6).
    pub fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let part = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let range = Self::new(
            normalize_date(part(1), part(2), part(3)),
            normalize_date(part(4), part(5), part(6)),
        );
        range.is_complete().then_some(range)
    }

    /// Both ends present.
    pub fn is_complete(&self) -> bool {
        !self.start_date.is_empty() && !self.end_date.is_empty()
    }

    /// Both ends present and in order. ISO strings compare chronologically.
    pub fn is_ordered(&self) -> bool {
        self.is_complete() && self.start_date <= self.end_date
    }
}

/// Normalize three captured date parts.
///
/// A four-character `c` means day-month-year, a four-character `a` means
/// year-month-day and a two-character `c` is a year in the 2000s. The
/// calendar is not consulted, so `31.02.2025` becomes `2025-02-31`.
pub fn normalize_date(a: &str, b: &str, c: &str) -> String {
    if c.len() == 4 {
        format!("{}-{:0>2}-{:0>2}", c, b, a)
    } else if a.len() == 4 {
        format!("{}-{:0>2}-{:0>2}", a, b, c)
    } else if c.len() == 2 {
        format!("20{}-{:0>2}-{:0>2}", c, b, a)
    } else {
        String::new()
    }
}

/// First date-looking substring of `text`, normalized. Empty when none.
pub fn find_date(text: &str) -> String {
    let dmy = DATE_DMY.captures(text);
    let ymd = DATE_YMD.captures(text);

    let caps = match (dmy, ymd) {
        (Some(d), Some(y)) => {
            if y.get(0).map(|m| m.start()) < d.get(0).map(|m| m.start()) {
                y
            } else {
                d
            }
        }
        (Some(d), None) => d,
        (None, Some(y)) => y,
        (None, None) => return String::new(),
    };

    normalize_date(&caps[1], &caps[2], &caps[3])
}
