//! Uninstall driven by the tracking store
//!
//! Only paths the store recorded are ever deleted. Files already gone count
//! as removed; a file that cannot be deleted keeps its record so a later run
//! can retry it.

use crate::report::Reporter;
use crate::tracking::TrackingStore;
use crate::{Error, Result};
use ctx_fs::{NormalizedPath, io};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalOptions {
    /// Prune directories left empty by the removal, deepest first.
    pub clean_empty_dirs: bool,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self {
            clean_empty_dirs: true,
        }
    }
}

/// What a removal pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: Vec<NormalizedPath>,
    pub already_missing: Vec<NormalizedPath>,
    pub failed: Vec<NormalizedPath>,
    pub pruned_dirs: Vec<PathBuf>,
    /// Whether the tracking file was deleted because nothing is left in it
    pub tracking_file_removed: bool,
}

impl RemovalReport {
    /// Whether every tracked file is gone.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Removes every file an installation recorded.
pub struct Remover<'a> {
    store: &'a mut TrackingStore,
    reporter: &'a mut dyn Reporter,
    options: RemovalOptions,
}

impl<'a> Remover<'a> {
    pub fn new(
        store: &'a mut TrackingStore,
        reporter: &'a mut dyn Reporter,
        options: RemovalOptions,
    ) -> Self {
        Self {
            store,
            reporter,
            options,
        }
    }

    /// Delete tracked files, prune emptied directories, then either delete
    /// the tracking file (nothing left) or save the survivors.
    ///
    /// Per-file failures are reported and counted rather than returned.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tracking file cannot be saved or deleted.
    pub fn run(mut self) -> Result<RemovalReport> {
        let base = self.store.base_path().to_path_buf();
        let mut report = RemovalReport::default();
        let mut parents = BTreeSet::new();

        for relative in self.store.list_tracked_paths() {
            if relative.is_absolute() || relative.has_parent_traversal() {
                let error = Error::InvalidPath {
                    path: relative.to_string(),
                };
                self.reporter.removal_failed(&relative, &error);
                report.failed.push(relative);
                continue;
            }

            let target = base.join(relative.to_native());
            match io::remove_file_if_exists(&target) {
                Ok(true) => {
                    self.reporter.file_removed(&relative);
                    report.removed.push(relative.clone());
                }
                Ok(false) => {
                    self.reporter.file_already_missing(&relative);
                    report.already_missing.push(relative.clone());
                }
                Err(e) => {
                    self.reporter.removal_failed(&relative, &Error::from(e));
                    report.failed.push(relative);
                    continue;
                }
            }

            let mut parent = relative.parent();
            while let Some(dir) = parent {
                parent = dir.parent();
                parents.insert(dir);
            }
            self.store.unrecord_file(&relative);
        }

        if self.options.clean_empty_dirs {
            let mut dirs: Vec<NormalizedPath> = parents.into_iter().collect();
            dirs.sort_by_key(|dir| Reverse(dir.components().count()));

            for dir in dirs {
                let path = base.join(dir.to_native());
                match io::remove_dir_if_empty(&path) {
                    Ok(true) => {
                        self.reporter.directory_pruned(&path);
                        report.pruned_dirs.push(path);
                    }
                    Ok(false) => {}
                    Err(e) => tracing::warn!(dir = %path.display(), error = %e, "Could not prune directory"),
                }
            }
        }

        if self.store.is_empty() {
            report.tracking_file_removed = self.store.remove_backing_file()?;
        } else {
            self.store.save()?;
        }

        tracing::debug!(
            removed = report.removed.len(),
            already_missing = report.already_missing.len(),
            failed = report.failed.len(),
            pruned = report.pruned_dirs.len(),
            "Removal finished"
        );
        Ok(report)
    }
}
