//! Per-file outcome reporting
//!
//! The sync engine and remover never print. They describe each outcome to a
//! [`Reporter`] the caller hands them, which decides how (and in which
//! language) to show it.

use crate::Error;
use crate::sync::SyncOutcome;
use ctx_fs::NormalizedPath;
use std::path::{Path, PathBuf};

/// Receiver for human-facing outcome notifications.
///
/// Every method has a no-op default so implementors only handle what they
/// care about.
#[allow(unused_variables)]
pub trait Reporter {
    /// A directory walk is starting.
    fn syncing_directory(&mut self, name: &str) {}

    /// An allow-listed directory is absent from the source tree.
    fn directory_missing(&mut self, name: &str) {}

    /// A file was installed or skipped.
    fn file_outcome(&mut self, path: &NormalizedPath, outcome: &SyncOutcome) {}

    /// Syncing a file failed; the batch stops after this.
    fn file_failed(&mut self, path: &NormalizedPath, error: &Error) {}

    /// A tracked file was deleted.
    fn file_removed(&mut self, path: &NormalizedPath) {}

    /// A tracked file was already gone.
    fn file_already_missing(&mut self, path: &NormalizedPath) {}

    /// A tracked file could not be deleted; its record is kept.
    fn removal_failed(&mut self, path: &NormalizedPath, error: &Error) {}

    /// An emptied directory was pruned.
    fn directory_pruned(&mut self, dir: &Path) {}
}

/// Reports through `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn syncing_directory(&mut self, name: &str) {
        tracing::info!(directory = name, "Syncing directory");
    }

    fn directory_missing(&mut self, name: &str) {
        tracing::warn!(directory = name, "Directory not found in source, skipping");
    }

    fn file_outcome(&mut self, path: &NormalizedPath, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Installed { backup: Some(backup) } => {
                tracing::info!(%path, backup = %backup.display(), "Installed (previous content backed up)");
            }
            SyncOutcome::Installed { backup: None } => tracing::info!(%path, "Installed"),
            SyncOutcome::SkippedIdentical => tracing::info!(%path, "Skipped, content identical"),
        }
    }

    fn file_failed(&mut self, path: &NormalizedPath, error: &Error) {
        tracing::error!(%path, %error, "Failed to sync file");
    }

    fn file_removed(&mut self, path: &NormalizedPath) {
        tracing::info!(%path, "Removed");
    }

    fn file_already_missing(&mut self, path: &NormalizedPath) {
        tracing::info!(%path, "Already removed");
    }

    fn removal_failed(&mut self, path: &NormalizedPath, error: &Error) {
        tracing::warn!(%path, %error, "Failed to remove file");
    }

    fn directory_pruned(&mut self, dir: &Path) {
        tracing::info!(dir = %dir.display(), "Removed empty directory");
    }
}

/// One notification captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    SyncingDirectory(String),
    DirectoryMissing(String),
    Installed {
        path: NormalizedPath,
        backup: Option<PathBuf>,
    },
    SkippedIdentical(NormalizedPath),
    /// Failure with the error rendered to text.
    FileFailed(NormalizedPath, String),
    FileRemoved(NormalizedPath),
    FileAlreadyMissing(NormalizedPath),
    RemovalFailed(NormalizedPath, String),
    DirectoryPruned(PathBuf),
}

/// Collects notifications in memory, in the order they were emitted.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths reported as installed, in order.
    pub fn installed(&self) -> Vec<&NormalizedPath> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Installed { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Paths reported as skipped, in order.
    pub fn skipped(&self) -> Vec<&NormalizedPath> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::SkippedIdentical(path) => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn syncing_directory(&mut self, name: &str) {
        self.events.push(ReportEvent::SyncingDirectory(name.to_string()));
    }

    fn directory_missing(&mut self, name: &str) {
        self.events.push(ReportEvent::DirectoryMissing(name.to_string()));
    }

    fn file_outcome(&mut self, path: &NormalizedPath, outcome: &SyncOutcome) {
        self.events.push(match outcome {
            SyncOutcome::Installed { backup } => ReportEvent::Installed {
                path: path.clone(),
                backup: backup.clone(),
            },
            SyncOutcome::SkippedIdentical => ReportEvent::SkippedIdentical(path.clone()),
        });
    }

    fn file_failed(&mut self, path: &NormalizedPath, error: &Error) {
        self.events
            .push(ReportEvent::FileFailed(path.clone(), error.to_string()));
    }

    fn file_removed(&mut self, path: &NormalizedPath) {
        self.events.push(ReportEvent::FileRemoved(path.clone()));
    }

    fn file_already_missing(&mut self, path: &NormalizedPath) {
        self.events.push(ReportEvent::FileAlreadyMissing(path.clone()));
    }

    fn removal_failed(&mut self, path: &NormalizedPath, error: &Error) {
        self.events
            .push(ReportEvent::RemovalFailed(path.clone(), error.to_string()));
    }

    fn directory_pruned(&mut self, dir: &Path) {
        self.events.push(ReportEvent::DirectoryPruned(dir.to_path_buf()));
    }
}
