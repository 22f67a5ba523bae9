//! Persistent record of installed files
//!
//! One tracking file describes one [`Installation`]: the destination root and
//! every file ctx-tool placed beneath it. The removal pass relies on it
//! exclusively, so it must stay precise: re-recording a path replaces the
//! old record, and a save never exposes a partially written file.

mod installation;
mod store;

pub use installation::{FileRecord, FileRecords, Installation};
pub use store::{StoreState, TrackingStore};
