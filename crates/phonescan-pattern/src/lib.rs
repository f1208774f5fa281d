//! Phone number grammar composition and matching.
//!
//! This crate builds a single compiled rule out of small named grammar
//! fragments (prefixes, separators and digit-group templates) and scans
//! free-form text with it.
//!
//! # Example
//!
//! ```
//! use phonescan_pattern::Grammar;
//!
//! let pattern = Grammar::indian().compile().unwrap();
//!
//! let found: Vec<_> = pattern
//!     .find_iter("Call +91 7036141002 or 022-24130000 today")
//!     .map(|m| m.as_str())
//!     .collect();
//! assert_eq!(found, ["+91 7036141002", "022-24130000"]);
//!
//! // Digits glued to other text are not a phone number.
//! assert!(!pattern.is_match("id:7036141002"));
//! ```

mod grammar;
mod matcher;

pub use grammar::{Grammar, PatternError, PatternSpec, NATIONAL_DIGITS};
pub use matcher::{Matches, PhoneMatch, PhonePattern};
