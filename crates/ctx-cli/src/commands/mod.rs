//! Command implementations for ctx-cli

pub mod add;
pub mod remove;
pub mod status;

pub use add::run_add;
pub use remove::run_remove;
pub use status::run_status;
