//! Inputs and results of a sync pass

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Read-only policy for one sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Top-level source directories that may be installed
    pub allowed: Vec<String>,
    /// Compare content before overwriting an existing destination file
    pub verify_checksums: bool,
    /// Keep a `.backup` copy of a differing destination file before
    /// overwriting it. Only consulted when `verify_checksums` is on.
    pub backup_on_conflict: bool,
}

impl SyncSettings {
    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == name)
    }

    /// Validate a requested top-level directory against `source_root`
    /// without touching the destination. Returns the source directory.
    ///
    /// # Errors
    ///
    /// [`Error::NotAllowed`] when `name` is not allow-listed, checked first;
    /// [`Error::NotFound`] when the source has no such directory.
    pub fn check_directory(&self, source_root: &Path, name: &str) -> Result<PathBuf> {
        if !self.is_allowed(name) {
            return Err(Error::NotAllowed {
                name: name.to_string(),
            });
        }

        let dir = source_root.join(name);
        if !dir.is_dir() {
            return Err(Error::NotFound { path: dir });
        }
        Ok(dir)
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Destination now holds the source content. `backup` names the copy of
    /// the previous, differing content when one was taken.
    Installed { backup: Option<PathBuf> },
    /// Destination already held identical content and was left untouched.
    SkippedIdentical,
}

impl SyncOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }

    pub fn backed_up(&self) -> bool {
        matches!(self, Self::Installed { backup: Some(_) })
    }
}

/// Tally across one or more sync calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub installed: usize,
    pub skipped: usize,
    pub backed_up: usize,
    /// Allow-listed directories absent from the source tree
    pub missing_directories: Vec<String>,
}

impl SyncSummary {
    pub fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Installed { backup } => {
                self.installed += 1;
                if backup.is_some() {
                    self.backed_up += 1;
                }
            }
            SyncOutcome::SkippedIdentical => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: SyncSummary) {
        self.installed += other.installed;
        self.skipped += other.skipped;
        self.backed_up += other.backed_up;
        self.missing_directories.extend(other.missing_directories);
    }

    /// Files touched or confirmed in total.
    pub fn total(&self) -> usize {
        self.installed + self.skipped
    }
}
