//! Shared test utilities for the ctx-tool workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`SourceTree`] and [`Workspace`] temporary directory fixtures
//! - [`git`]: local upstream repositories for exercising the git source

pub mod git;
pub mod tree;

pub use tree::{SourceTree, Workspace};
