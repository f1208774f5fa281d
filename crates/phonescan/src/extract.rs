//! Reading candidate files and pulling phone numbers out of them.

use crate::error::{Error, Result};
use phonescan_pattern::PhonePattern;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A phone number found in a file, exactly as written there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub path: PathBuf,
    pub number: String,
}

/// Every number found in one file, in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatches {
    pub path: PathBuf,
    pub numbers: Vec<String>,
}

impl FileMatches {
    pub fn into_found(self) -> impl Iterator<Item = Found> {
        let path = self.path;
        self.numbers.into_iter().map(move |number| Found {
            path: path.clone(),
            number,
        })
    }
}

pub fn extract_from_str(pattern: &PhonePattern, text: &str) -> Vec<String> {
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Read a whole file as UTF-8. The handle is closed before this returns.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn extract_from_file(pattern: &PhonePattern, path: &Path) -> Result<FileMatches> {
    let text = read_text(path)?;
    let numbers = extract_from_str(pattern, &text);
    debug!(path = %path.display(), count = numbers.len(), "scanned file");
    Ok(FileMatches {
        path: path.to_path_buf(),
        numbers,
    })
}
