//! Content fingerprints for files and directory trees
//!
//! A [`Digest`] is the lowercase hex MD5 of a file's bytes. It is used for
//! equality testing only: deciding whether a destination file already holds
//! the content a source file would install. Metadata (timestamps, modes) never
//! contributes, so the same bytes fingerprint identically on every platform.

use md5::{Digest as _, Md5};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

/// Name of the version-control metadata directory never walked into.
pub const VCS_DIR: &str = ".git";

/// Hex-encoded content fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Fingerprint an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Md5::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stream a file through the hash function.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub fn fingerprint(path: &Path) -> Result<Digest> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Md5::new();
    io::copy(&mut reader, &mut hasher).map_err(|e| Error::io(path, e))?;
    Ok(Digest(format!("{:x}", hasher.finalize())))
}

/// Compare two files by content.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if either side does not exist, or
/// [`Error::Io`] if either side cannot be read.
pub fn files_are_identical(a: &Path, b: &Path) -> Result<bool> {
    for path in [a, b] {
        if !path.exists() {
            return Err(Error::not_found(path));
        }
    }

    Ok(fingerprint(a)? == fingerprint(b)?)
}

/// Fingerprint every eligible file below `root`.
///
/// Keys are slash-separated paths relative to `root`. Eligibility follows
/// [`eligible_files`].
pub fn fingerprint_tree(root: &Path) -> Result<BTreeMap<String, Digest>> {
    let mut digests = BTreeMap::new();

    for path in eligible_files(root)? {
        let path = path?;
        let Some(relative) = NormalizedPath::relative_to(&path, root) else {
            continue;
        };

        match fingerprint(&path) {
            Ok(digest) => {
                digests.insert(relative.as_str().to_string(), digest);
            }
            // Vanished between listing and reading.
            Err(e) if e.is_not_found() => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(digests)
}

/// Walk `root` yielding every regular file eligible for syncing, in file-name
/// order.
///
/// Directory entries are not yielded, entries whose own name begins with `.`
/// are skipped, and `.git` directories are never descended into. A file that
/// disappears mid-walk is skipped silently; any other walk failure is yielded
/// as [`Error::Io`].
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `root` itself does not exist.
pub fn eligible_files(root: &Path) -> Result<impl Iterator<Item = Result<PathBuf>> + '_> {
    fs::metadata(root).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::not_found(root)
        } else {
            Error::io(root, e)
        }
    })?;

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == VCS_DIR));

    Ok(walker.filter_map(move |entry| match entry {
        Ok(entry) if !is_regular_file(&entry) => None,
        Ok(entry) if is_hidden(entry.file_name()) => None,
        Ok(entry) => Some(Ok(entry.into_path())),
        Err(err) => {
            let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            let source = io::Error::from(err);
            if source.kind() == io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), "entry vanished during walk");
                None
            } else {
                Some(Err(Error::io(path, source)))
            }
        }
    }))
}

fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Whether a file name marks a hidden entry.
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_known_value() {
        assert_eq!(
            Digest::of_bytes(b"hello world").as_str(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
    }

    #[test]
    fn empty_input_has_stable_digest() {
        assert_eq!(
            Digest::of_bytes(b"").as_str(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn file_fingerprint_matches_bytes_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.yaml");
        fs::write(&path, "v1").unwrap();

        assert_eq!(fingerprint(&path).unwrap(), Digest::of_bytes(b"v1"));
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden(OsStr::new(".DS_Store")));
        assert!(!is_hidden(OsStr::new("app.yaml")));
    }
}
