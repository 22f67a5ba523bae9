//! Filesystem primitives for ctx-tool
//!
//! Provides content digests, slash-normalized relative paths and safe I/O
//! operations used by the sync and tracking layers.

pub mod config;
pub mod digest;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use digest::{Digest, eligible_files, files_are_identical, fingerprint, fingerprint_tree};
pub use error::{Error, Result};
pub use path::NormalizedPath;
