//! Candidate file discovery.
//!
//! Walks a directory tree depth-first in filesystem enumeration order and
//! hands out the files whose name ends with the configured extension.
//! Symbolic links are not followed, so a link back up the tree cannot make
//! the walk loop.

use crate::cancel::CancelFlag;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSION: &str = ".txt";

/// File name suffix selecting candidate files. Accepts `txt` or `.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension(String);

impl Extension {
    pub fn new(ext: &str) -> Self {
        if ext.starts_with('.') {
            Self(ext.to_string())
        } else {
            Self(format!(".{}", ext))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map_or(false, |n| n.to_string_lossy().ends_with(&self.0))
    }
}

impl Default for Extension {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    CandidateFile,
    Ignored,
}

/// Classify a walked path. `is_dir` comes from the entry's own file type,
/// so a symlink to a directory is not a `Directory`.
pub fn classify(path: &Path, is_dir: bool, extension: &Extension) -> EntryKind {
    if is_dir {
        EntryKind::Directory
    } else if extension.matches(path) {
        EntryKind::CandidateFile
    } else {
        EntryKind::Ignored
    }
}

/// Lazy depth-first walk yielding candidate files under `root`.
pub struct CandidateFiles {
    root: PathBuf,
    walker: walkdir::IntoIter,
    extension: Extension,
    cancel: CancelFlag,
}

impl Iterator for CandidateFiles {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cancel.is_raised() {
                debug!("walk cancelled");
                return None;
            }

            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(Error::from_walk(err, &self.root))),
            };

            match classify(entry.path(), entry.file_type().is_dir(), &self.extension) {
                EntryKind::Directory => {
                    debug!(path = %entry.path().display(), "descending");
                }
                EntryKind::CandidateFile => return Some(Ok(entry.into_path())),
                EntryKind::Ignored => {
                    trace!(path = %entry.path().display(), "ignored");
                }
            }
        }
    }
}

pub fn candidate_files(root: &Path, extension: &Extension, cancel: CancelFlag) -> CandidateFiles {
    CandidateFiles {
        root: root.to_path_buf(),
        walker: WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter(),
        extension: extension.clone(),
        cancel,
    }
}
