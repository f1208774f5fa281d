//! Grammar fragments and the decision tree they compose into.

use crate::matcher::PhonePattern;
use thiserror::Error;

/// Number of digits every alternative must cover, separators excluded.
pub const NATIONAL_DIGITS: usize = 10;

/// Zero or one whitespace character or dash.
const SEPARATOR: &str = r"(?:\s|-)?";

/// End of text, a whitespace run, or one closing punctuation mark followed by either.
const TRAILING_BOUNDARY: &str = r"(?:\z|\s+|[.,;:!?](?:\z|\s+))";

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("alternative '{name}' covers {count} digits, expected {expected}")]
    DigitCount {
        name: String,
        count: usize,
        expected: usize,
    },
    #[error("alternative '{name}' contains an empty digit group")]
    EmptyGroup { name: String },
    #[error("alternative '{name}' has an invalid leading digit set")]
    InvalidLeading { name: String },
    #[error("fragment '{name}' cannot be used as a digit-group alternative")]
    NotDigitGroups { name: String },
    #[error("prefix '{name}' has no alternatives")]
    EmptyAlternation { name: String },
    #[error("fragment '{name}' cannot be used as a prefix")]
    NotAlternation { name: String },
    #[error("grammar has no digit-group alternatives")]
    NoAlternatives,
    #[error("failed to compile phone pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// An immutable, named fragment of the phone number grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSpec {
    /// Exactly one of a list of literal strings. An empty string means the
    /// fragment may match nothing; it is always tried last.
    Alternation {
        name: String,
        alternatives: Vec<String>,
    },
    /// Fixed-size digit groups with an optional separator between groups.
    /// `leading` restricts the first digit of the first group.
    DigitGroups {
        name: String,
        leading: Option<String>,
        groups: Vec<usize>,
    },
}

impl PatternSpec {
    pub fn alternation<I, S>(name: &str, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Alternation {
            name: name.to_string(),
            alternatives: alternatives.into_iter().map(Into::into).collect(),
        }
    }

    pub fn digit_groups(name: &str, groups: &[usize]) -> Self {
        Self::DigitGroups {
            name: name.to_string(),
            leading: None,
            groups: groups.to_vec(),
        }
    }

    /// Digit groups whose first digit must come from `leading`, e.g. `"789"`.
    pub fn leading_digit_groups(name: &str, leading: &str, groups: &[usize]) -> Self {
        Self::DigitGroups {
            name: name.to_string(),
            leading: Some(leading.to_string()),
            groups: groups.to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Alternation { name, .. } | Self::DigitGroups { name, .. } => name,
        }
    }

    /// Total digits matched, or `None` for alternations.
    pub fn digit_count(&self) -> Option<usize> {
        match self {
            Self::Alternation { .. } => None,
            Self::DigitGroups { groups, .. } => Some(groups.iter().sum()),
        }
    }

    /// Regex source for this fragment, as a non-capturing group.
    pub fn render(&self) -> String {
        match self {
            Self::Alternation { alternatives, .. } => {
                let literal: Vec<String> = alternatives
                    .iter()
                    .filter(|alt| !alt.is_empty())
                    .map(|alt| regex::escape(alt))
                    .collect();
                let optional = alternatives.iter().any(|alt| alt.is_empty());
                if literal.is_empty() {
                    return String::new();
                }
                let body = format!("(?:{})", literal.join("|"));
                if optional {
                    format!("{}?", body)
                } else {
                    body
                }
            }
            Self::DigitGroups {
                leading, groups, ..
            } => {
                let mut out = String::from("(?:");
                for (i, &size) in groups.iter().enumerate() {
                    if i > 0 {
                        out.push_str(SEPARATOR);
                    }
                    match (i, leading) {
                        (0, Some(digits)) => {
                            out.push_str(&format!("[{}]", digits));
                            if size > 1 {
                                out.push_str(&format!("[0-9]{{{}}}", size - 1));
                            }
                        }
                        _ => out.push_str(&format!("[0-9]{{{}}}", size)),
                    }
                }
                out.push(')');
                out
            }
        }
    }

    fn validate_alternative(&self) -> Result<(), PatternError> {
        let Self::DigitGroups {
            name,
            leading,
            groups,
        } = self
        else {
            return Err(PatternError::NotDigitGroups {
                name: self.name().to_string(),
            });
        };

        if groups.is_empty() || groups.contains(&0) {
            return Err(PatternError::EmptyGroup { name: name.clone() });
        }
        if let Some(digits) = leading {
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(PatternError::InvalidLeading { name: name.clone() });
            }
        }

        let count: usize = groups.iter().sum();
        if count != NATIONAL_DIGITS {
            return Err(PatternError::DigitCount {
                name: name.clone(),
                count,
                expected: NATIONAL_DIGITS,
            });
        }
        Ok(())
    }
}

/// The decision tree: one prefix alternation, one separator, then the
/// digit-group alternatives in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    prefix: PatternSpec,
    alternatives: Vec<PatternSpec>,
}

impl Grammar {
    pub fn new(prefix: PatternSpec) -> Self {
        Self {
            prefix,
            alternatives: Vec::new(),
        }
    }

    /// Append an alternative. Earlier alternatives win ties at the same position.
    pub fn alternative(mut self, spec: PatternSpec) -> Self {
        self.alternatives.push(spec);
        self
    }

    /// Indian national numbers: mobile and landline, with optional `0`, `91`,
    /// `+91` or parenthesized country prefix.
    pub fn indian() -> Self {
        let prefix = PatternSpec::alternation("prefix", ["0", "+91", "91", "(+91)", "(91)", ""]);

        Self::new(prefix)
            .alternative(PatternSpec::digit_groups("plain-10", &[10]))
            .alternative(PatternSpec::leading_digit_groups("mobile-3-3-4", "789", &[3, 3, 4]))
            .alternative(PatternSpec::leading_digit_groups("mobile-2-3-5", "789", &[2, 3, 5]))
            .alternative(PatternSpec::leading_digit_groups("mobile-5-5", "789", &[5, 5]))
            .alternative(PatternSpec::digit_groups("landline-2-8", &[2, 8]))
            .alternative(PatternSpec::digit_groups("landline-3-7", &[3, 7]))
            .alternative(PatternSpec::digit_groups("landline-4-6", &[4, 6]))
    }

    pub fn prefix(&self) -> &PatternSpec {
        &self.prefix
    }

    pub fn alternatives(&self) -> &[PatternSpec] {
        &self.alternatives
    }

    /// Full regex source. The only capture group spans prefix through digits.
    pub fn source(&self) -> Result<String, PatternError> {
        match &self.prefix {
            PatternSpec::Alternation { name, alternatives } if alternatives.is_empty() => {
                return Err(PatternError::EmptyAlternation { name: name.clone() });
            }
            PatternSpec::Alternation { .. } => {}
            PatternSpec::DigitGroups { name, .. } => {
                return Err(PatternError::NotAlternation { name: name.clone() });
            }
        }
        if self.alternatives.is_empty() {
            return Err(PatternError::NoAlternatives);
        }
        for alt in &self.alternatives {
            alt.validate_alternative()?;
        }

        let body: Vec<String> = self.alternatives.iter().map(PatternSpec::render).collect();
        Ok(format!(
            r"\A({}{}(?:{})){}",
            self.prefix.render(),
            SEPARATOR,
            body.join("|"),
            TRAILING_BOUNDARY
        ))
    }

    pub fn compile(&self) -> Result<PhonePattern, PatternError> {
        let source = self.source()?;
        Ok(PhonePattern::from_source(&source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_alternatives_cover_ten_digits() {
        let grammar = Grammar::indian();
        assert_eq!(grammar.alternatives().len(), 7);
        for alt in grammar.alternatives() {
            assert_eq!(alt.digit_count(), Some(NATIONAL_DIGITS), "{}", alt.name());
        }
    }

    #[test]
    fn test_render_prefix_puts_empty_last() {
        let spec = PatternSpec::alternation("prefix", ["0", "", "+91"]);
        assert_eq!(spec.render(), r"(?:0|\+91)?");
    }

    #[test]
    fn test_render_digit_groups_with_leading() {
        let spec = PatternSpec::leading_digit_groups("m", "789", &[3, 3, 4]);
        assert_eq!(
            spec.render(),
            r"(?:[789][0-9]{2}(?:\s|-)?[0-9]{3}(?:\s|-)?[0-9]{4})"
        );
    }

    #[test]
    fn test_render_empty_only_alternation() {
        let spec = PatternSpec::alternation("none", [""]);
        assert_eq!(spec.render(), "");
    }

    #[test]
    fn test_invalid_leading_rejected() {
        let grammar = Grammar::new(PatternSpec::alternation("prefix", [""]))
            .alternative(PatternSpec::leading_digit_groups("m", "7a", &[5, 5]));
        assert!(matches!(
            grammar.compile(),
            Err(PatternError::InvalidLeading { .. })
        ));
    }

    #[test]
    fn test_render_plain() {
        let spec = PatternSpec::digit_groups("plain", &[10]);
        assert_eq!(spec.render(), "(?:[0-9]{10})");
    }

    #[test]
    fn test_wrong_digit_count_rejected() {
        let grammar = Grammar::new(PatternSpec::alternation("prefix", [""]))
            .alternative(PatternSpec::digit_groups("short", &[3, 3, 3]));
        assert!(matches!(
            grammar.compile(),
            Err(PatternError::DigitCount { count: 9, .. })
        ));
    }

    #[test]
    fn test_empty_group_rejected() {
        let grammar = Grammar::new(PatternSpec::alternation("prefix", [""]))
            .alternative(PatternSpec::digit_groups("gap", &[5, 0, 5]));
        assert!(matches!(
            grammar.compile(),
            Err(PatternError::EmptyGroup { .. })
        ));
    }

    #[test]
    fn test_no_alternatives_rejected() {
        let grammar = Grammar::new(PatternSpec::alternation("prefix", ["0"]));
        assert!(matches!(
            grammar.compile(),
            Err(PatternError::NoAlternatives)
        ));
    }

    #[test]
    fn test_alternation_as_alternative_rejected() {
        let grammar = Grammar::new(PatternSpec::alternation("prefix", ["0"]))
            .alternative(PatternSpec::alternation("words", ["ten"]));
        assert!(matches!(
            grammar.compile(),
            Err(PatternError::NotDigitGroups { .. })
        ));
    }

    #[test]
    fn test_prefix_without_alternatives_rejected() {
        let grammar = Grammar::new(PatternSpec::alternation("prefix", Vec::<String>::new()))
            .alternative(PatternSpec::digit_groups("plain", &[10]));
        assert!(matches!(
            grammar.compile(),
            Err(PatternError::EmptyAlternation { .. })
        ));
    }

    #[test]
    fn test_empty_string_only_prefix_is_optional() {
        let pattern = Grammar::new(PatternSpec::alternation("prefix", [""]))
            .alternative(PatternSpec::digit_groups("plain", &[10]))
            .compile()
            .unwrap();
        assert!(pattern.is_match("7036141002"));
        assert!(!pattern.is_match("+917036141002"));
    }

    #[test]
    fn test_digit_groups_as_prefix_rejected() {
        let grammar = Grammar::new(PatternSpec::digit_groups("p", &[2]))
            .alternative(PatternSpec::digit_groups("plain", &[10]));
        assert!(matches!(
            grammar.compile(),
            Err(PatternError::NotAlternation { .. })
        ));
    }

    #[test]
    fn test_source_has_single_capture_group() {
        let pattern = Grammar::indian().compile().unwrap();
        assert_eq!(pattern.captures_len(), 2);
    }
}
