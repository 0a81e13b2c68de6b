//! Rule-based field extractors for Romanian electricity invoices.
//!
//! Every field is extracted by an ordered cascade of [`Rule`]s. A rule pairs
//! a compiled pattern with a function that turns its captures into a value,
//! returning `None` when the captured text fails a plausibility check. The
//! first rule producing a value wins.

pub mod dates;
pub mod numbers;
pub mod patterns;
pub mod text;

pub use dates::{find_date, normalize_date, DateRange};
pub use numbers::{normalize_amount, normalize_number};

use regex::{Captures, Regex};
use tracing::trace;

/// How many matches of a rule's pattern are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Only the leftmost match is considered.
    First,
    /// Every match is considered in order until one is accepted.
    All,
}

type Extract<'a, T> = Box<dyn Fn(&Captures<'_>) -> Option<T> + 'a>;

/// One step of a field cascade.
pub struct Rule<'a, T> {
    /// Short name used in traces.
    pub name: &'static str,
    pattern: &'a Regex,
    scan: Scan,
    extract: Extract<'a, T>,
}

impl<'a, T> Rule<'a, T> {
    pub fn new(
        name: &'static str,
        pattern: &'a Regex,
        extract: impl Fn(&Captures<'_>) -> Option<T> + 'a,
    ) -> Self {
        Self {
            name,
            pattern,
            scan: Scan::First,
            extract: Box::new(extract),
        }
    }

    /// Try every match of the pattern rather than only the first one.
    pub fn scanning(mut self) -> Self {
        self.scan = Scan::All;
        self
    }

    /// Apply this rule to `text`.
    pub fn apply(&self, text: &str) -> Option<T> {
        match self.scan {
            Scan::First => self
                .pattern
                .captures(text)
                .and_then(|caps| (self.extract)(&caps)),
            Scan::All => self
                .pattern
                .captures_iter(text)
                .find_map(|caps| (self.extract)(&caps)),
        }
    }
}

/// Run a cascade, returning the value of the first accepting rule.
pub fn first_match<T>(text: &str, rules: &[Rule<'_, T>]) -> Option<T> {
    rules.iter().find_map(|rule| {
        let value = rule.apply(text)?;
        trace!(rule = rule.name, "cascade rule accepted");
        Some(value)
    })
}

/// Capture group `i` as trimmed text, if it participated in the match.
pub fn group<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
    caps.get(i).map(|m| m.as_str().trim())
}

/// An extracted value together with the phrase it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Label of the source phrase.
    pub source: String,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref WORD: Regex = Regex::new(r"code\s+(\w+)").unwrap();
        static ref DIGITS: Regex = Regex::new(r"(\d+)").unwrap();
    }

    fn long_word(caps: &Captures<'_>) -> Option<String> {
        group(caps, 1).filter(|w| w.len() >= 4).map(str::to_string)
    }

    #[test]
    fn test_first_scan_only_sees_leftmost_match() {
        let rules = [Rule::new("word", &*WORD, long_word)];
        assert_eq!(first_match("code ab code abcd", &rules), None);
    }

    #[test]
    fn test_scanning_rule_tries_later_matches() {
        let rules = [Rule::new("word", &*WORD, long_word).scanning()];
        assert_eq!(first_match("code ab code abcd", &rules), Some("abcd".to_string()));
    }

    #[test]
    fn test_rejected_rule_falls_through_to_next() {
        let rules = [
            Rule::new("word", &*WORD, long_word),
            Rule::new("digits", &*DIGITS, |caps| group(caps, 1).map(str::to_string)),
        ];
        assert_eq!(first_match("code ab 42", &rules), Some("42".to_string()));
    }

    #[test]
    fn test_empty_cascade_yields_none() {
        let rules: [Rule<'_, String>; 0] = [];
        assert_eq!(first_match("anything", &rules), None);
    }
}
