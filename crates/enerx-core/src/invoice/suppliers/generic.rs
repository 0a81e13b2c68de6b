//! Client-name cascade shared by every supplier family.

use regex::Captures;

use crate::invoice::rules::patterns::{
    CLIENT_BEFORE_LABEL, CLIENT_CONSUMER, CLIENT_NAMED, CLIENT_NAME_EXCLUDED, CLIENT_NAME_SHAPE,
    CLIENT_UPPERCASE,
};
use crate::invoice::rules::text::collapse_whitespace;
use crate::invoice::rules::{first_match, group, Rule};

/// Client name from `CLIENT <NAME>` blocks, then consumer/beneficiary and
/// name labels. Empty when nothing plausible is found.
pub fn client_name(text: &str) -> String {
    let rules = [
        Rule::new("client before label", &*CLIENT_BEFORE_LABEL, accept_client_name).scanning(),
        Rule::new("client", &*CLIENT_UPPERCASE, accept_client_name).scanning(),
        Rule::new("consumer", &*CLIENT_CONSUMER, accept_client_name).scanning(),
        Rule::new("name label", &*CLIENT_NAMED, accept_client_name).scanning(),
    ];
    first_match(text, &rules).unwrap_or_default()
}

/// Accept capture group 1 as a client name: at least five characters of
/// upper-case letters, spaces, dots and dashes, and not a label word.
pub fn accept_client_name(caps: &Captures<'_>) -> Option<String> {
    let name = collapse_whitespace(group(caps, 1)?);
    let plausible = name.chars().count() >= 5
        && !is_label_word(&name)
        && CLIENT_NAME_SHAPE.is_match(&name);
    plausible.then_some(name)
}

/// Words that appear in client position but name a field, not a client.
pub fn is_label_word(name: &str) -> bool {
    CLIENT_NAME_EXCLUDED.is_match(name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_before_address() {
        let text = "CLIENT SC EXEMPLU INDUSTRIES SRL\nAdresa: Str. Mare 1";
        assert_eq!(client_name(text), "SC EXEMPLU INDUSTRIES SRL");
    }

    #[test]
    fn test_label_words_are_skipped() {
        let text = "CLIENT NONCASNIC Cod 12\nCLIENT PRIMARIA ORAS CUI 123";
        assert_eq!(client_name(text), "PRIMARIA ORAS");
    }

    #[test]
    fn test_consumer_fallback() {
        let text = "Consumator: SCOALA GIMNAZIALA\n";
        assert_eq!(client_name(text), "SCOALA GIMNAZIALA");
    }

    #[test]
    fn test_mixed_case_is_rejected() {
        assert_eq!(client_name("Client Ion Popescu"), "");
    }
}
