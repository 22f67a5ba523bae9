//! SyncEngine implementation
//!
//! Per file, the engine applies this decision table in order:
//!
//! 1. Destination missing: copy, record, `Installed`.
//! 2. Destination present and verification on: compare fingerprints.
//!    Equal content is left untouched but still recorded (`SkippedIdentical`).
//!    Differing content is optionally backed up to `<name>.backup`, then
//!    overwritten and recorded (`Installed`).
//! 3. Destination present and verification off: overwrite and record
//!    (`Installed`), never backing up.
//!
//! A failure aborts the current call without undoing earlier files. Re-running
//! is safe because identical files are skipped.

use super::{SyncOutcome, SyncSettings, SyncSummary};
use crate::report::Reporter;
use crate::tracking::TrackingStore;
use crate::{Error, Result};
use ctx_fs::{NormalizedPath, eligible_files, fingerprint, io};
use std::path::{Path, PathBuf};

/// Suffix appended to a destination file name for its conflict backup.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Sibling path that receives the previous content of `dst`.
pub fn backup_path(dst: &Path) -> PathBuf {
    let mut name = dst.file_name().unwrap_or_default().to_os_string();
    name.push(BACKUP_SUFFIX);
    dst.with_file_name(name)
}

/// Applies source subtrees onto a tracked destination.
///
/// The destination root is the store's base path, so records and files can
/// never disagree about where an installation lives.
pub struct SyncEngine<'a> {
    source_root: PathBuf,
    settings: &'a SyncSettings,
    store: &'a mut TrackingStore,
    reporter: &'a mut dyn Reporter,
    source_label: String,
}

impl<'a> SyncEngine<'a> {
    /// Create an engine reading from `source_root`.
    ///
    /// Records are labelled with the source root's path; use
    /// [`with_source_label`](Self::with_source_label) to name the origin
    /// differently, e.g. when the root is a throwaway checkout.
    pub fn new(
        source_root: impl Into<PathBuf>,
        settings: &'a SyncSettings,
        store: &'a mut TrackingStore,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        let source_root = source_root.into();
        let source_label = source_root.display().to_string();
        Self {
            source_root,
            settings,
            store,
            reporter,
            source_label,
        }
    }

    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn destination_root(&self) -> &Path {
        self.store.base_path()
    }

    pub fn store(&self) -> &TrackingStore {
        &*self.store
    }

    /// Sync every allow-listed directory.
    ///
    /// Directories absent from the source are reported and skipped; any other
    /// failure stops the pass.
    pub fn sync_all(&mut self) -> Result<SyncSummary> {
        let settings = self.settings;
        let mut summary = SyncSummary::default();

        for name in &settings.allowed {
            if !self.source_root.join(name).exists() {
                self.reporter.directory_missing(name);
                summary.missing_directories.push(name.clone());
                continue;
            }
            summary.merge(self.sync_directory(name)?);
        }

        Ok(summary)
    }

    /// Sync one allow-listed top-level directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAllowed`] before touching the filesystem when
    /// `name` is not allow-listed, [`Error::NotFound`] when it is missing
    /// from the source or is not a directory, and the first per-file failure
    /// otherwise.
    pub fn sync_directory(&mut self, name: &str) -> Result<SyncSummary> {
        let dir = self.settings.check_directory(&self.source_root, name)?;

        self.reporter.syncing_directory(name);
        tracing::debug!(directory = name, source = %dir.display(), "Walking source directory");

        let mut summary = SyncSummary::default();
        for path in eligible_files(&dir)? {
            let path = match path {
                Ok(path) => path,
                Err(error) => {
                    let relative = match &error {
                        ctx_fs::Error::Io { path, .. } => {
                            NormalizedPath::relative_to(path, &self.source_root)
                        }
                        _ => None,
                    }
                    .unwrap_or_else(|| NormalizedPath::new(name));
                    let error = Error::from(error);
                    self.reporter.file_failed(&relative, &error);
                    return Err(error);
                }
            };
            let Some(relative) = NormalizedPath::relative_to(&path, &self.source_root) else {
                continue;
            };
            let outcome = self.sync_file(&relative)?;
            summary.record(&outcome);
        }

        Ok(summary)
    }

    /// Apply one source file, given relative to the source root.
    ///
    /// The outcome, or the failure, is reported before returning.
    pub fn sync_file(&mut self, relative: &NormalizedPath) -> Result<SyncOutcome> {
        match self.apply(relative) {
            Ok(outcome) => {
                self.reporter.file_outcome(relative, &outcome);
                Ok(outcome)
            }
            Err(error) => {
                self.reporter.file_failed(relative, &error);
                Err(error)
            }
        }
    }

    fn apply(&mut self, relative: &NormalizedPath) -> Result<SyncOutcome> {
        if relative.is_absolute() || relative.has_parent_traversal() || relative.as_str() == "." {
            return Err(Error::InvalidPath {
                path: relative.to_string(),
            });
        }

        let src = self.source_root.join(relative.to_native());
        let dst = self.store.base_path().join(relative.to_native());
        if !src.is_file() {
            return Err(ctx_fs::Error::not_found(src).into());
        }

        let outcome = if !dst.exists() {
            tracing::debug!(path = %relative, "Destination missing, installing");
            io::copy_preserving_permissions(&src, &dst)?;
            SyncOutcome::Installed { backup: None }
        } else if self.settings.verify_checksums {
            if fingerprint(&src)? == fingerprint(&dst)? {
                tracing::debug!(path = %relative, "Content identical, leaving destination untouched");
                SyncOutcome::SkippedIdentical
            } else {
                let backup = if self.settings.backup_on_conflict {
                    let backup = backup_path(&dst);
                    io::copy_preserving_permissions(&dst, &backup)?;
                    tracing::debug!(path = %relative, backup = %backup.display(), "Backed up differing destination");
                    Some(backup)
                } else {
                    None
                };
                io::copy_preserving_permissions(&src, &dst)?;
                SyncOutcome::Installed { backup }
            }
        } else {
            tracing::debug!(path = %relative, "Verification off, overwriting");
            io::copy_preserving_permissions(&src, &dst)?;
            SyncOutcome::Installed { backup: None }
        };

        self.store.record_file(relative, &dst, &self.source_label)?;
        Ok(outcome)
    }
}
