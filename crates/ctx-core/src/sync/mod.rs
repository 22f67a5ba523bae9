//! Source-to-destination synchronization
//!
//! [`SyncEngine`] walks allow-listed subtrees of a local source tree and
//! applies each file onto the installation's destination root, recording
//! every result in the [`TrackingStore`](crate::TrackingStore).

mod engine;
mod outcome;

pub use engine::{BACKUP_SUFFIX, SyncEngine, backup_path};
pub use outcome::{SyncOutcome, SyncSettings, SyncSummary};
