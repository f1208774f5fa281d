pub mod cancel;
pub mod cli;
pub mod discover;
pub mod error;
pub mod extract;
pub mod output;
pub mod scan;

pub use error::{Error, Result};
pub use phonescan_pattern::{Grammar, PatternError, PatternSpec, PhoneMatch, PhonePattern};
