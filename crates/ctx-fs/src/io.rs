//! Atomic writes and permission-preserving copies

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::{Error, Result};

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename in the target's directory, so a reader
/// sees either the previous contents or the new contents, never a prefix.
/// An existing target keeps its permissions; a new one is created `0644` on
/// Unix rather than the temp file's private `0600`.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut temp_file = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_file.path(), e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(temp_file.path(), e))?;

    if let Some(permissions) = target_permissions(path) {
        temp_file
            .as_file()
            .set_permissions(permissions)
            .map_err(|e| Error::io(temp_file.path(), e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| Error::io(path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "atomic write complete");
    Ok(())
}

fn target_permissions(path: &Path) -> Option<fs::Permissions> {
    match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Copy `src` over `dst`, creating parent directories and carrying over the
/// source's permission bits.
///
/// Returns the number of bytes copied.
pub fn copy_preserving_permissions(src: &Path, dst: &Path) -> Result<u64> {
    if let Some(parent) = dst.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let bytes = fs::copy(src, dst).map_err(|e| Error::io(src, e))?;

    let permissions = fs::metadata(src)
        .map_err(|e| Error::io(src, e))?
        .permissions();
    fs::set_permissions(dst, permissions).map_err(|e| Error::io(dst, e))?;

    Ok(bytes)
}

/// Remove a file, treating an already-missing file as success.
///
/// Returns `true` if a file was actually deleted.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Remove `dir` if, and only if, it is an empty directory.
///
/// Returns `true` if the directory was removed.
pub fn remove_dir_if_empty(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io(dir, e)),
    };

    if entries.next().is_some() {
        return Ok(false);
    }

    fs::remove_dir(dir).map_err(|e| Error::io(dir, e))?;
    Ok(true)
}
