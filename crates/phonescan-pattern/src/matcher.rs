//! The compiled phone pattern and its left-to-right scanner.

use regex::Regex;
use std::ops::Range;

/// A compiled phone number rule. Immutable once built, so one value can be
/// shared by every scan and every thread.
#[derive(Debug, Clone)]
pub struct PhonePattern {
    regex: Regex,
}

impl PhonePattern {
    pub(crate) fn from_source(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn captures_len(&self) -> usize {
        self.regex.captures_len()
    }

    /// All non-overlapping phone numbers in `text`, left to right.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            regex: &self.regex,
            text,
            pos: 0,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find_iter(text).next().is_some()
    }
}

/// A phone number exactly as written, prefix and separators included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneMatch<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> PhoneMatch<'t> {
    pub fn as_str(&self) -> &'t str {
        self.text
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Iterator over the phone numbers in a text.
///
/// A candidate position is the start of the text or the first character
/// after a run of whitespace. At each candidate the anchored rule is tried;
/// on success scanning resumes after the consumed trailing boundary.
#[derive(Debug)]
pub struct Matches<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    pos: usize,
}

impl<'r, 't> Iterator for Matches<'r, 't> {
    type Item = PhoneMatch<'t>;

    fn next(&mut self) -> Option<PhoneMatch<'t>> {
        loop {
            let at = next_boundary(self.text, self.pos)?;
            let rest = &self.text[at..];

            if let Some(caps) = self.regex.captures(rest) {
                if let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) {
                    self.pos = at + whole.end();
                    return Some(PhoneMatch {
                        text: number.as_str(),
                        start: at + number.start(),
                        end: at + number.end(),
                    });
                }
            }

            self.pos = at + rest.chars().next().map_or(1, char::len_utf8);
        }
    }
}

/// First non-whitespace position at or after `from` that starts the text or
/// follows a whitespace character.
///
/// Whitespace is skipped even though the empty prefix plus the optional
/// separator could consume one space, so a match never begins with whitespace.
fn next_boundary(text: &str, from: usize) -> Option<usize> {
    let mut after_space = from == 0
        || text[..from]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);

    for (i, c) in text.get(from..)?.char_indices() {
        let space = c.is_whitespace();
        if after_space && !space {
            return Some(from + i);
        }
        after_space = space;
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::{Grammar, PhonePattern};

    fn pattern() -> PhonePattern {
        Grammar::indian().compile().unwrap()
    }

    fn find_all(text: &str) -> Vec<String> {
        pattern()
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_plain_ten_digits() {
        assert_eq!(find_all("7036141002"), ["7036141002"]);
        assert_eq!(find_all(" 0123456789\n"), ["0123456789"]);
        assert_eq!(find_all("1234567890"), ["1234567890"]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(find_all("703614100").is_empty());
        assert!(find_all("12345678901").is_empty());
        assert!(find_all("id 123456789012 end").is_empty());
    }

    #[test]
    fn test_prefixes_keep_written_form() {
        for written in [
            "+917036141002",
            "917036141002",
            "07036141002",
            "7036141002",
            "0-7036141002",
            "+91 7036141002",
            "(+91)7036141002",
            "(91) 7036141002",
        ] {
            assert_eq!(find_all(&format!("tel {} ok", written)), [written]);
        }
    }

    #[test]
    fn test_mobile_groups() {
        assert_eq!(find_all("703 614 1002"), ["703 614 1002"]);
        assert_eq!(find_all("70-361-41002"), ["70-361-41002"]);
        assert_eq!(find_all("98765 43210"), ["98765 43210"]);
        assert_eq!(find_all("+91-987-654-3210"), ["+91-987-654-3210"]);
    }

    #[test]
    fn test_mobile_leading_digit_enforced() {
        assert!(find_all("603 614 1002").is_empty());
        assert!(find_all("12-345-67890").is_empty());
        assert_eq!(find_all("6036141002"), ["6036141002"]);
    }

    #[test]
    fn test_landline_groups() {
        assert_eq!(find_all("022-24130000"), ["022-24130000"]);
        assert_eq!(find_all("0416-2565478"), ["0416-2565478"]);
        assert_eq!(find_all("080 2345678"), ["080 2345678"]);
        assert_eq!(find_all("0416 256547"), ["0416 256547"]);
        assert!(find_all("022-2413-0000").is_empty());
    }

    #[test]
    fn test_boundary_rejection() {
        assert!(find_all("x7036141002y").is_empty());
        assert!(find_all("call 7036141002y").is_empty());
        assert!(find_all("call x7036141002").is_empty());
        assert!(find_all("7036141002-").is_empty());
    }

    #[test]
    fn test_trailing_punctuation() {
        assert_eq!(find_all("Office: 022-24130000."), ["022-24130000"]);
        assert_eq!(
            find_all("call 7036141002, or 8036141002!\n"),
            ["7036141002", "8036141002"]
        );
        assert!(find_all("7036141002.5").is_empty());
    }

    #[test]
    fn test_adjacent_numbers_separated_by_one_space() {
        assert_eq!(
            find_all("7036141002 8036141002\n9036141002"),
            ["7036141002", "8036141002", "9036141002"]
        );
    }

    #[test]
    fn test_sentence() {
        assert_eq!(
            find_all("Call me at +91 7036141002 soon"),
            ["+91 7036141002"]
        );
    }

    #[test]
    fn test_match_offsets() {
        let pattern = pattern();
        let text = "née  07036141002 end";
        let m = pattern.find_iter(text).next().unwrap();
        assert_eq!(&text[m.range()], "07036141002");
        assert_eq!(m.start(), 6);
        assert_eq!(m.end(), 17);
    }

    #[test]
    fn test_empty_and_whitespace_text() {
        assert!(find_all("").is_empty());
        assert!(find_all("   \n\t").is_empty());
        assert!(!pattern().is_match("no numbers here"));
    }

    #[test]
    fn test_match_never_starts_with_whitespace() {
        assert_eq!(find_all("a  7036141002"), ["7036141002"]);
        assert_eq!(find_all("\t 022 24130000"), ["022 24130000"]);
    }
}
