//! Integer token scanner
//!
//! Finds standalone runs of ASCII digits and splits them by parity.
//! A run counts only when neither neighbour is an ASCII word character
//! (`[A-Za-z0-9_]`), so `x1` and `22y` are skipped but `(42)` and `é7`
//! are not.

use std::sync::OnceLock;

use regex::Regex;

use crate::host::{Range, TextDocument};

/// Maximal digit runs; boundaries are checked by hand so they stay ASCII.
fn digit_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[0-9]+").expect("digit pattern is valid"))
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// One standalone integer found in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberToken<'a> {
    /// The digits as written, leading zeros included
    pub digits: &'a str,
    /// Byte offset of the first digit
    pub start: usize,
    /// Byte offset just past the last digit
    pub end: usize,
}

impl NumberToken<'_> {
    /// Numeric value, if it fits in a u64
    pub fn value(&self) -> Option<u64> {
        self.digits.parse().ok()
    }

    /// Parity from the last digit, exact for any length
    pub fn is_even(&self) -> bool {
        self.digits
            .bytes()
            .last()
            .is_some_and(|d| (d - b'0') % 2 == 0)
    }
}

/// Standalone integer tokens in left-to-right order
pub fn tokens(text: &str) -> impl Iterator<Item = NumberToken<'_>> {
    let bytes = text.as_bytes();
    digit_runs().find_iter(text).filter_map(move |m| {
        let before = m.start().checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(m.end()).copied();
        if before.is_some_and(is_word_byte) || after.is_some_and(is_word_byte) {
            return None;
        }
        Some(NumberToken {
            digits: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
    })
}

/// Split the tokens of `text` into (even, odd), each in document order
pub fn scan_text(text: &str) -> (Vec<NumberToken<'_>>, Vec<NumberToken<'_>>) {
    tokens(text).partition(|t| t.is_even())
}

/// Ranges to paint, grouped by parity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    pub even: Vec<Range>,
    pub odd: Vec<Range>,
}

/// Scan a document and map token offsets to editor positions
pub fn scan(document: &dyn TextDocument) -> Highlights {
    let text = document.text();
    let mut highlights = Highlights::default();

    for token in tokens(&text) {
        let range = Range::new(
            document.position_at(token.start),
            document.position_at(token.end),
        );
        if token.is_even() {
            highlights.even.push(range);
        } else {
            highlights.odd.push(range);
        }
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::StringDocument;
    use crate::host::Position;

    fn digits<'a>(tokens: &[NumberToken<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.digits).collect()
    }

    #[test]
    fn test_empty_text() {
        let (even, odd) = scan_text("");
        assert!(even.is_empty());
        assert!(odd.is_empty());
        assert_eq!(scan(&StringDocument::new("")), Highlights::default());
    }

    #[test]
    fn test_simple_partition() {
        let (even, odd) = scan_text("1 2 3 4");
        assert_eq!(digits(&even), vec!["2", "4"]);
        assert_eq!(digits(&odd), vec!["1", "3"]);
        assert_eq!((even[0].start, even[0].end), (2, 3));
    }

    #[test]
    fn test_identifier_digits_excluded() {
        let (even, odd) = scan_text("x1 22y 333");
        assert!(even.is_empty());
        assert_eq!(digits(&odd), vec!["333"]);
    }

    #[test]
    fn test_underscore_is_a_word_character() {
        let (even, odd) = scan_text("_7 8_ a_9 10");
        assert_eq!(digits(&even), vec!["10"]);
        assert!(odd.is_empty());
    }

    #[test]
    fn test_punctuation_is_a_boundary() {
        let (even, odd) = scan_text("f(12, 7); x=-4 [0] 3.5");
        assert_eq!(digits(&even), vec!["12", "4", "0"]);
        assert_eq!(digits(&odd), vec!["7", "3", "5"]);
    }

    #[test]
    fn test_non_ascii_letters_are_boundaries() {
        let (even, odd) = scan_text("é7 ß8 日9");
        assert_eq!(digits(&even), vec!["8"]);
        assert_eq!(digits(&odd), vec!["7", "9"]);
    }

    #[test]
    fn test_zero_and_leading_zeros() {
        let (even, odd) = scan_text("0 007 010");
        assert_eq!(digits(&even), vec!["0", "010"]);
        assert_eq!(digits(&odd), vec!["007"]);
    }

    #[test]
    fn test_value() {
        let (even, odd) = scan_text("42 99999999999999999999999999");
        assert_eq!(even[0].value(), Some(42));
        assert_eq!(odd[0].value(), None);
        assert!(!odd[0].is_even());
    }

    #[test]
    fn test_every_token_lands_once() {
        let text = "10 a1 11\n12_ 13 14b 15\n\t16,17";
        let (even, odd) = scan_text(text);
        let mut found: Vec<_> = even.iter().chain(&odd).collect();
        found.sort_by_key(|t| t.start);
        let digits: Vec<_> = found.iter().map(|t| t.digits).collect();
        assert_eq!(digits, ["10", "11", "13", "15", "16", "17"]);
        assert!(even.iter().all(|t| t.value().unwrap() % 2 == 0));
        assert!(odd.iter().all(|t| t.value().unwrap() % 2 == 1));
        assert!(even.iter().all(|t| !odd.contains(t)));
    }

    #[test]
    fn test_scan_maps_to_positions() {
        let doc = StringDocument::new("a 1\n22 x3\n  5");
        let highlights = scan(&doc);

        assert_eq!(
            highlights.even,
            vec![Range::new(Position::new(1, 0), Position::new(1, 2))]
        );
        assert_eq!(
            highlights.odd,
            vec![
                Range::new(Position::new(0, 2), Position::new(0, 3)),
                Range::new(Position::new(2, 2), Position::new(2, 3)),
            ]
        );
    }
}
