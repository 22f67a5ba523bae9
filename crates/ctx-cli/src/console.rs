//! Colored, localized console output for sync and removal outcomes

use colored::Colorize;
use ctx_core::{Error, Reporter, SyncOutcome, TracingReporter};
use ctx_fs::NormalizedPath;
use std::path::Path;

use crate::messages::Messages;

/// Prints each outcome as it happens and mirrors it to the log.
pub struct ConsoleReporter<'a> {
    messages: &'a Messages,
    log: TracingReporter,
}

impl<'a> ConsoleReporter<'a> {
    pub fn new(messages: &'a Messages) -> Self {
        Self {
            messages,
            log: TracingReporter,
        }
    }
}

impl Reporter for ConsoleReporter<'_> {
    fn syncing_directory(&mut self, name: &str) {
        self.log.syncing_directory(name);
        println!("{} {}", "=>".blue().bold(), self.messages.syncing_directory(name));
    }

    fn directory_missing(&mut self, name: &str) {
        self.log.directory_missing(name);
        println!("{} {}", "WARN".yellow().bold(), self.messages.directory_not_found(name));
    }

    fn file_outcome(&mut self, path: &NormalizedPath, outcome: &SyncOutcome) {
        self.log.file_outcome(path, outcome);
        match outcome {
            SyncOutcome::Installed { backup: Some(backup) } => println!(
                "   {} {}",
                "+".green(),
                self.messages.backed_up(path, backup.display())
            ),
            SyncOutcome::Installed { backup: None } => {
                println!("   {} {}", "+".green(), self.messages.installed(path))
            }
            SyncOutcome::SkippedIdentical => println!(
                "   {} {}",
                "=".dimmed(),
                self.messages.skipped_identical(path).dimmed()
            ),
        }
    }

    fn file_failed(&mut self, path: &NormalizedPath, error: &Error) {
        self.log.file_failed(path, error);
        eprintln!("   {} {}", "!".red(), self.messages.sync_failed(path, error));
    }

    fn file_removed(&mut self, path: &NormalizedPath) {
        self.log.file_removed(path);
        println!("   {} {}", "-".red(), self.messages.removed(path));
    }

    fn file_already_missing(&mut self, path: &NormalizedPath) {
        self.log.file_already_missing(path);
        println!(
            "   {} {}",
            "-".dimmed(),
            self.messages.already_removed(path).dimmed()
        );
    }

    fn removal_failed(&mut self, path: &NormalizedPath, error: &Error) {
        self.log.removal_failed(path, error);
        eprintln!("   {} {}", "!".red(), self.messages.removal_failed(path, error));
    }

    fn directory_pruned(&mut self, dir: &Path) {
        self.log.directory_pruned(dir);
        println!(
            "   {} {}",
            "-".dimmed(),
            self.messages.pruned_directory(dir.display())
        );
    }
}
