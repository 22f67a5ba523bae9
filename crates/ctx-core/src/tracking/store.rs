//! Load/save lifecycle for a tracking file

use super::{FileRecord, Installation};
use crate::scope::Scope;
use crate::{Error, Result};
use ctx_fs::{NormalizedPath, fingerprint, io};
use std::fs;
use std::path::{Path, PathBuf};

/// Lifecycle position of a [`TrackingStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Nothing read from disk yet
    Uninitialized,
    /// Matches the backing file, or a fresh installation if there was none
    Loaded,
    /// Records changed since the last load or save
    Mutated,
    /// Written back to disk
    Persisted,
}

/// Owns the in-memory [`Installation`] for one tracking file.
///
/// A store is single-owner: concurrent invocations against the same tracking
/// file are not coordinated beyond the atomic rename on save.
#[derive(Debug)]
pub struct TrackingStore {
    path: PathBuf,
    installation: Installation,
    /// Destination the caller installs into; `None` adopts the persisted one.
    expected_base: Option<PathBuf>,
    state: StoreState,
}

impl TrackingStore {
    /// Create a store for installing into `base_path`.
    ///
    /// Call [`load`](Self::load) before mutating so existing records are kept.
    pub fn new(path: impl Into<PathBuf>, scope: Scope, base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        Self {
            path: path.into(),
            installation: Installation::new(scope, base_path.clone()),
            expected_base: Some(base_path),
            state: StoreState::Uninitialized,
        }
    }

    /// Open an existing tracking file, adopting whatever destination it
    /// records.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the file does not exist, and
    /// [`Error::CorruptState`] if it cannot be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(ctx_fs::Error::not_found(&path).into());
        }

        let mut store = Self {
            installation: Installation::new(Scope::default(), "."),
            path,
            expected_base: None,
            state: StoreState::Uninitialized,
        };
        store.load()?;
        Ok(store)
    }

    /// Read the backing file, replacing the in-memory installation.
    ///
    /// A missing file leaves a fresh, empty installation in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptState`] for an unparseable file and
    /// [`Error::BasePathMismatch`] when the file belongs to another
    /// destination.
    pub fn load(&mut self) -> Result<()> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No tracking file yet, starting fresh");
                self.state = StoreState::Loaded;
                return Ok(());
            }
            Err(e) => return Err(ctx_fs::Error::io(&self.path, e).into()),
        };

        let installation: Installation =
            serde_json::from_str(&content).map_err(|e| Error::CorruptState {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        if let Some(expected) = &self.expected_base
            && installation.base_path != *expected
        {
            return Err(Error::BasePathMismatch {
                path: self.path.clone(),
                expected: expected.clone(),
                found: installation.base_path,
            });
        }

        tracing::debug!(
            path = %self.path.display(),
            files = installation.files.len(),
            "Loaded tracking file"
        );
        self.installation = installation;
        self.state = StoreState::Loaded;
        Ok(())
    }

    /// Write the installation back as indented JSON, atomically.
    pub fn save(&mut self) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.installation)?;
        content.push('\n');
        io::write_atomic(&self.path, content.as_bytes())?;

        tracing::debug!(
            path = %self.path.display(),
            files = self.installation.files.len(),
            "Saved tracking file"
        );
        self.state = StoreState::Persisted;
        Ok(())
    }

    /// Fingerprint the file now at `installed` and upsert its record under
    /// `relative`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the installed file cannot be stat'd or read.
    /// No record is written in that case.
    pub fn record_file(
        &mut self,
        relative: &NormalizedPath,
        installed: &Path,
        source: &str,
    ) -> Result<()> {
        let size = fs::metadata(installed)
            .map_err(|e| ctx_fs::Error::io(installed, e))?
            .len();
        let digest = fingerprint(installed)?;

        let replaced = self.installation.files.upsert(FileRecord {
            path: relative.clone(),
            digest,
            size,
            source: source.to_string(),
        });
        tracing::debug!(path = %relative, replaced = replaced.is_some(), "Recorded file");
        self.state = StoreState::Mutated;
        Ok(())
    }

    /// Drop the record for `relative`; absent paths are ignored.
    pub fn unrecord_file(&mut self, relative: &NormalizedPath) -> Option<FileRecord> {
        let removed = self.installation.files.remove(relative);
        if removed.is_some() {
            self.state = StoreState::Mutated;
        }
        removed
    }

    /// Every recorded relative path.
    pub fn list_tracked_paths(&self) -> Vec<NormalizedPath> {
        self.installation
            .files
            .iter()
            .map(|record| record.path.clone())
            .collect()
    }

    pub fn get(&self, relative: &NormalizedPath) -> Option<&FileRecord> {
        self.installation.files.get(relative)
    }

    pub fn is_empty(&self) -> bool {
        self.installation.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.installation.files.len()
    }

    pub fn installation(&self) -> &Installation {
        &self.installation
    }

    pub fn base_path(&self) -> &Path {
        &self.installation.base_path
    }

    pub fn scope(&self) -> Scope {
        self.installation.scope
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Delete the backing file. Returns whether a file was removed.
    pub fn remove_backing_file(&mut self) -> Result<bool> {
        let removed = io::remove_file_if_exists(&self.path)?;
        tracing::debug!(path = %self.path.display(), removed, "Removed tracking file");
        self.state = StoreState::Persisted;
        Ok(removed)
    }
}
