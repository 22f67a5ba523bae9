//! Sync and tracking engine for ctx-tool
//!
//! This crate holds the decision logic of ctx-tool:
//!
//! - **Tracking store**: the persisted record of every file an installation
//!   placed under its destination root
//! - **Sync engine**: copies allow-listed source subtrees onto the
//!   destination, deciding per file whether to install, skip or back up
//! - **Removal**: the reverse pass, driven entirely by the tracking store
//! - **Configuration**: layered YAML config with environment overrides
//!
//! # Architecture
//!
//! ```text
//!        ctx-cli
//!           |
//!       ctx-core
//!   (config, sync, tracking, removal, report)
//!           |
//!        ctx-fs
//! ```
//!
//! All human-facing output flows through the [`Reporter`] trait, which callers
//! pass in explicitly.

pub mod config;
pub mod error;
pub mod removal;
pub mod report;
pub mod scope;
pub mod sync;
pub mod tracking;

pub use config::{Config, ConfigResolver, ConfigSource, ResolvedConfig};
pub use error::{Error, Result};
pub use removal::{RemovalOptions, RemovalReport, Remover};
pub use report::{RecordingReporter, ReportEvent, Reporter, TracingReporter};
pub use scope::{InstallTarget, Scope};
pub use sync::{SyncEngine, SyncOutcome, SyncSettings, SyncSummary};
pub use tracking::{FileRecord, FileRecords, Installation, StoreState, TrackingStore};
