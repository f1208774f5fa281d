//! The extraction pipeline: walk, read, match.
//!
//! Errors for individual files or directory entries are yielded in place
//! and the walk carries on; only a missing or unusable root stops a scan
//! before it starts.

use crate::cancel::CancelFlag;
use crate::discover::{candidate_files, CandidateFiles, Extension};
use crate::error::{Error, Result};
use crate::extract::{extract_from_file, FileMatches, Found};
use phonescan_pattern::PhonePattern;
use rayon::prelude::*;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub numbers_found: usize,
    pub errors: usize,
}

impl ScanStats {
    pub fn record(&mut self, result: &Result<FileMatches>) {
        match result {
            Ok(matches) => {
                self.files_scanned += 1;
                self.numbers_found += matches.numbers.len();
            }
            Err(_) => self.errors += 1,
        }
    }
}

pub struct Scanner<'p> {
    pattern: &'p PhonePattern,
    extension: Extension,
    cancel: CancelFlag,
}

impl<'p> Scanner<'p> {
    pub fn new(pattern: &'p PhonePattern, extension: Extension) -> Self {
        Self {
            pattern,
            extension,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Lazily scan `root`, yielding each number as soon as its file is read.
    pub fn scan(&self, root: &Path) -> Result<Scan<'p>> {
        check_root(root)?;
        debug!(root = %root.display(), extension = self.extension.as_str(), "starting scan");
        Ok(Scan {
            pattern: self.pattern,
            files: candidate_files(root, &self.extension, self.cancel.clone()),
            pending: Vec::new().into_iter(),
            stats: ScanStats::default(),
        })
    }

    /// Read candidate files on the rayon pool. Results come back in walk
    /// order, one entry per candidate file or walk error.
    pub fn scan_parallel(&self, root: &Path) -> Result<Vec<Result<FileMatches>>> {
        check_root(root)?;
        let entries: Vec<Result<_>> =
            candidate_files(root, &self.extension, self.cancel.clone()).collect();
        debug!(files = entries.len(), "collected candidates");

        Ok(entries
            .into_par_iter()
            .filter_map(|entry| {
                if self.cancel.is_raised() {
                    return None;
                }
                Some(entry.and_then(|path| extract_from_file(self.pattern, &path)))
            })
            .collect())
    }

    pub fn extract(&self, path: &Path) -> Result<FileMatches> {
        extract_from_file(self.pattern, path)
    }
}

/// The root must exist, be a directory and be listable before any item is
/// produced.
fn check_root(root: &Path) -> Result<()> {
    let unreadable = |source| Error::RootUnreadable {
        path: root.to_path_buf(),
        source,
    };

    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(Error::RootNotDirectory {
                path: root.to_path_buf(),
            })
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::RootNotFound {
                path: root.to_path_buf(),
            })
        }
        Err(source) => return Err(unreadable(source)),
    }

    std::fs::read_dir(root).map_err(unreadable)?;
    Ok(())
}

/// Ordered, single-pass sequence of numbers found under a root.
pub struct Scan<'p> {
    pattern: &'p PhonePattern,
    files: CandidateFiles,
    pending: std::vec::IntoIter<Found>,
    stats: ScanStats,
}

impl Scan<'_> {
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }
}

impl Iterator for Scan<'_> {
    type Item = Result<Found>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.next() {
                return Some(Ok(found));
            }

            let result = match self.files.next()? {
                Ok(path) => extract_from_file(self.pattern, &path),
                Err(err) => Err(err),
            };
            self.stats.record(&result);

            match result {
                Ok(matches) => {
                    self.pending = matches.into_found().collect::<Vec<_>>().into_iter();
                }
                Err(err) => {
                    warn!(error = %err, "skipping entry");
                    return Some(Err(err));
                }
            }
        }
    }
}
