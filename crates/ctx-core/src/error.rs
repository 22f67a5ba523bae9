//! Error types for ctx-core

use std::path::PathBuf;

/// Result type for ctx-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ctx-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested subtree is outside the configured allow-list
    #[error("Directory '{name}' is not in the allowed list")]
    NotAllowed { name: String },

    /// Expected source subtree is missing or is not a directory
    #[error("Source directory not found: {path}")]
    NotFound { path: PathBuf },

    /// Tracking file exists but cannot be parsed
    #[error("Tracking file {path} is corrupt: {message}")]
    CorruptState { path: PathBuf, message: String },

    /// Persisted installation belongs to a different destination
    #[error("Tracking file {path} records base path {found}, expected {expected}")]
    BasePathMismatch {
        path: PathBuf,
        expected: PathBuf,
        found: PathBuf,
    },

    /// Relative path escapes its root
    #[error("Refusing path outside the destination root: {path}")]
    InvalidPath { path: String },

    /// Explicitly requested configuration file does not exist
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Environment override holds a value of the wrong shape
    #[error("Invalid value for {key}: {value}")]
    InvalidConfigValue { key: String, value: String },

    /// Unknown installation scope label
    #[error("Invalid scope: {scope}")]
    InvalidScope { scope: String },

    /// Home directory could not be determined
    #[error("Could not determine the home directory")]
    NoHomeDir,

    /// Filesystem error from ctx-fs
    #[error(transparent)]
    Fs(#[from] ctx_fs::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a filesystem failure rather than a validation
    /// failure.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Fs(ctx_fs::Error::Io { .. }))
    }
}
