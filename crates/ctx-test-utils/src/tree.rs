//! Temporary directory fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `content` to `root/relative`, creating parent directories.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn write_file(root: &Path, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("write_file: failed to create {}: {e}", parent.display()));
    }
    fs::write(&path, content)
        .unwrap_or_else(|e| panic!("write_file: failed to write {}: {e}", path.display()));
    path
}

/// A source tree laid out the way an upstream configuration repository is.
///
/// # Example
///
/// ```rust,no_run
/// use ctx_test_utils::SourceTree;
///
/// let source = SourceTree::new()
///     .with_file("configA/app.yaml", "v1")
///     .with_file("configA/.hidden", "skip me");
/// assert!(source.root().join("configA/app.yaml").exists());
/// ```
pub struct SourceTree {
    temp_dir: TempDir,
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTree {
    /// Create an empty source tree.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Builder form of [`write`](Self::write).
    pub fn with_file(self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        self.write(relative, content);
        self
    }

    /// Write (or rewrite) a file below the root.
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(self.root(), relative, content)
    }

    /// Return the root path of the tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// An isolated user environment: a home directory, a project directory to
/// run from, and a config directory, all under one temporary root.
pub struct Workspace {
    temp_dir: TempDir,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create the workspace with empty `home/`, `project/` and `config/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["home", "project", "config"] {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    pub fn project(&self) -> PathBuf {
        self.root().join("project")
    }

    /// Stand-in for the platform config directory (`XDG_CONFIG_HOME`).
    pub fn config_dir(&self) -> PathBuf {
        self.root().join("config")
    }

    /// Write a file relative to the project directory.
    pub fn write_project_file(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.project(), relative, content)
    }

    /// Read a project file as text.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_project_file(&self, relative: &str) -> String {
        let path = self.project().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that `relative` exists below the project directory.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_project_file_exists(&self, relative: &str) {
        let full_path = self.project().join(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `relative` does **not** exist below the project directory.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_project_file_not_exists(&self, relative: &str) {
        let full_path = self.project().join(relative);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
