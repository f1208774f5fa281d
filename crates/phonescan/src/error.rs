use phonescan_pattern::PatternError;
use std::io;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Root directory '{}' does not exist", .path.display())]
    RootNotFound { path: PathBuf },

    #[error("Root path '{}' is not a directory", .path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("Failed to access root directory '{}'", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{}'", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File '{}' is not valid UTF-8", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("Failed to walk '{}'", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid phone pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convert a walk failure. A failure on the root itself means the scan
    /// cannot begin, so it becomes `RootUnreadable`.
    pub(crate) fn from_walk(err: walkdir::Error, root: &Path) -> Self {
        let depth = err.depth();
        let path = err.path().unwrap_or(root).to_path_buf();
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));

        if depth == 0 {
            Error::RootUnreadable { path, source }
        } else {
            Error::Walk { path, source }
        }
    }

    /// Errors confined to a single file or directory entry. The scan can
    /// carry on past these.
    pub fn is_per_entry(&self) -> bool {
        matches!(
            self,
            Error::ReadFile { .. } | Error::Decode { .. } | Error::Walk { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes for the `phonescan` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every candidate file was scanned
    Success = 0,
    /// The scan finished but some files could not be read
    ReadErrors = 1,
    /// The scan could not start or its output could not be written
    Fatal = 2,
    /// Stopped by Ctrl-C
    Interrupted = 130,
}
