//! Where configuration trees are read from
//!
//! Either a local directory the user points at, or a fresh checkout of the
//! configured repository in a temporary directory that is deleted on drop.

use git2::FetchOptions;
use git2::build::RepoBuilder;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::{CliError, Result};

/// A materialized source tree.
#[derive(Debug)]
pub enum Source {
    Local(PathBuf),
    Cloned {
        checkout: TempDir,
        url: String,
        branch: String,
    },
}

impl Source {
    /// Use an existing directory as-is.
    pub fn local(path: &Path, not_a_directory: impl FnOnce() -> String) -> Result<Self> {
        if !path.is_dir() {
            return Err(CliError::user(not_a_directory()));
        }
        Ok(Self::Local(path.to_path_buf()))
    }

    /// Clone `branch` of `url` into a temporary directory.
    ///
    /// Remote URLs are fetched shallowly; local repositories are cloned in
    /// full because the local transport does not support shallow fetches.
    pub fn clone_repository(url: &str, branch: &str) -> Result<Self> {
        let checkout = tempfile::Builder::new().prefix("ctx-tool-").tempdir()?;

        let mut fetch = FetchOptions::new();
        if !Path::new(url).exists() {
            fetch.depth(1);
        }

        tracing::debug!(url, branch, dest = %checkout.path().display(), "Cloning repository");
        RepoBuilder::new()
            .branch(branch)
            .fetch_options(fetch)
            .clone(url, checkout.path())?;

        Ok(Self::Cloned {
            checkout,
            url: url.to_string(),
            branch: branch.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Cloned { checkout, .. } => checkout.path(),
        }
    }

    /// Provenance recorded with every installed file.
    pub fn label(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::Cloned { url, branch, .. } => format!("{url}#{branch}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctx_test_utils::git::upstream_repo;
    use ctx_test_utils::tree::write_file;

    #[test]
    fn local_source_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "file.txt", "x");

        let err = Source::local(&file, || "not a dir".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "not a dir");
        assert!(Source::local(dir.path(), String::new).is_ok());
    }

    #[test]
    fn clone_checks_out_requested_branch() {
        let upstream = tempfile::tempdir().unwrap();
        write_file(upstream.path(), "PRPs/readme.md", "prp");
        upstream_repo(upstream.path(), "development");
        let url = upstream.path().to_string_lossy().into_owned();

        let source = Source::clone_repository(&url, "development").unwrap();

        assert_eq!(
            std::fs::read_to_string(source.root().join("PRPs/readme.md")).unwrap(),
            "prp"
        );
        assert_eq!(source.label(), format!("{url}#development"));
    }

    #[test]
    fn clone_of_missing_branch_fails() {
        let upstream = tempfile::tempdir().unwrap();
        write_file(upstream.path(), "a.md", "a");
        upstream_repo(upstream.path(), "main");

        let url = upstream.path().to_string_lossy().into_owned();
        let err = Source::clone_repository(&url, "nope").unwrap_err();
        assert!(matches!(err, CliError::Git(_)));
    }
}
