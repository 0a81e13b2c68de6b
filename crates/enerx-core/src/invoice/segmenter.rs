//! Splitting multi-site documents into per-site text segments.
//!
//! A segment is chosen for each site code by the first strategy that finds
//! the code:
//!
//! 1. the page (between page-break markers) containing the code,
//! 2. the section between two recurring headers of the supplier layout,
//! 3. a character window around the first occurrence of the code,
//! 4. the whole document.

use regex::Regex;
use tracing::{debug, trace};

use super::rules::patterns::PAGE_BREAK;
use super::rules::text::{back_chars, forward_chars};

/// Separator placed between pages by text acquisition.
pub const PAGE_SEPARATOR: &str = "\n\n--- PAGE BREAK ---\n\n";

/// A header phrase that opens a per-site section.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    pub pattern: &'static Regex,
    /// Characters before the header that still belong to its section.
    pub lookbehind: usize,
}

/// How a supplier layout is cut into per-site sections.
#[derive(Debug, Clone)]
pub struct SegmentationProfile {
    /// Header rules, tried in order.
    pub headers: Vec<HeaderRule>,
    /// Characters kept before the code in the window fallback.
    pub window_before: usize,
    /// Characters kept after the code in the window fallback.
    pub window_after: usize,
}

/// Text belonging to one site code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub code: String,
    pub text: &'a str,
}

/// Produce exactly one segment per code, in the order of `codes`.
pub fn segment<'a>(
    text: &'a str,
    codes: &[String],
    skip_first_page: bool,
    profile: &SegmentationProfile,
) -> Vec<Segment<'a>> {
    codes
        .iter()
        .map(|code| Segment {
            code: code.clone(),
            text: section_for(text, code, skip_first_page, profile),
        })
        .collect()
}

/// Find the text belonging to `code`.
pub fn section_for<'a>(
    text: &'a str,
    code: &str,
    skip_first_page: bool,
    profile: &SegmentationProfile,
) -> &'a str {
    if let Some(page) = page_containing(text, code, skip_first_page) {
        trace!(code, "segment from page");
        return page.trim();
    }

    let Some(position) = text.find(code) else {
        debug!(code, "code not in text, using whole document");
        return text;
    };

    for header in &profile.headers {
        if let Some(section) = header_section(text, code, header) {
            trace!(code, header = header.pattern.as_str(), "segment from header section");
            return section.trim();
        }
    }

    trace!(code, "segment from window");
    let start = back_chars(text, position, profile.window_before);
    let end = forward_chars(text, position, profile.window_after);
    text[start..end].trim()
}

/// Split at page-break markers. `None` when the text has no markers.
pub fn pages(text: &str) -> Option<Vec<&str>> {
    PAGE_BREAK
        .is_match(text)
        .then(|| PAGE_BREAK.split(text).collect())
}

fn page_containing<'a>(text: &'a str, code: &str, skip_first_page: bool) -> Option<&'a str> {
    let skip = usize::from(skip_first_page);
    pages(text)?
        .into_iter()
        .skip(skip)
        .find(|page| page.contains(code))
}

fn header_section<'a>(text: &'a str, code: &str, header: &HeaderRule) -> Option<&'a str> {
    let starts: Vec<usize> = header.pattern.find_iter(text).map(|m| m.start()).collect();

    starts.iter().enumerate().find_map(|(i, &start)| {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let from = back_chars(text, start, header.lookbehind);
        let section = &text[from..end];
        section.contains(code).then_some(section)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use pretty_assertions::assert_eq;

    lazy_static! {
        static ref SITE_HEADER: Regex = Regex::new(r"SITE DETAILS").unwrap();
    }

    fn profile() -> SegmentationProfile {
        SegmentationProfile {
            headers: vec![HeaderRule {
                pattern: &*SITE_HEADER,
                lookbehind: 0,
            }],
            window_before: 5,
            window_after: 10,
        }
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_one_segment_per_code_from_pages() {
        let text = "cover\n--- PAGE BREAK ---\nsite 111 data\n--- PAGE BREAK ---\nsite 222 data";
        let segments = segment(text, &codes(&["111", "222"]), false, &profile());

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "site 111 data");
        assert_eq!(segments[1].text, "site 222 data");
    }

    #[test]
    fn test_skip_first_page() {
        let text = "summary 111 222\n---PAGE BREAK---\nsite 111 data";
        assert_eq!(section_for(text, "111", false, &profile()), "summary 111 222");
        assert_eq!(section_for(text, "111", true, &profile()), "site 111 data");
    }

    #[test]
    fn test_header_sections_without_pages() {
        let text = "intro SITE DETAILS a 111 SITE DETAILS b 222 tail";
        assert_eq!(section_for(text, "222", false, &profile()), "SITE DETAILS b 222 tail");
        assert_eq!(section_for(text, "111", false, &profile()), "SITE DETAILS a 111");
    }

    #[test]
    fn test_window_fallback() {
        let text = "aaaaaaaaaa 333 bbbbbbbbbbbbbbb";
        assert_eq!(section_for(text, "333", false, &profile()), "aaaa 333 bbbbbb");
    }

    #[test]
    fn test_absent_code_yields_whole_text() {
        let text = "nothing here";
        assert_eq!(section_for(text, "444", false, &profile()), text);
    }

    #[test]
    fn test_pages_requires_marker() {
        assert!(pages("single page").is_none());
        assert_eq!(pages("a --- PAGE BREAK --- b").map(|p| p.len()), Some(2));
    }
}
