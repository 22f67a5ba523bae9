//! The remove command: uninstall everything a previous add recorded

use colored::Colorize;
use ctx_core::{RemovalOptions, Remover, Scope, TrackingStore};

use crate::console::ConsoleReporter;
use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::interactive;

/// Run the remove command
pub fn run_remove(ctx: &AppContext, global: bool, force: bool) -> Result<()> {
    let messages = &ctx.messages;
    let scope = if global { Scope::Global } else { Scope::Project };
    let target = ctx.target(scope)?;

    println!("{}", messages.removal_scope(scope));
    println!("{}", messages.tracking_file(target.tracking_file.display()));

    if !target.tracking_file.is_file() {
        return Err(CliError::user(
            messages.no_tracking_file(target.tracking_file.display()),
        ));
    }

    let mut store = TrackingStore::open(&target.tracking_file)?;
    let tracked = store.list_tracked_paths();
    if tracked.is_empty() {
        println!("{}", messages.nothing_to_remove());
        return Ok(());
    }

    println!();
    println!("{}", messages.found_tracked_files(tracked.len()));
    for path in &tracked {
        println!("   {} {}", "-".dimmed(), path);
    }

    if !force {
        println!();
        if !interactive::confirm(&messages.confirm_removal())? {
            println!("{}", messages.removal_cancelled());
            return Ok(());
        }
    }

    let options = RemovalOptions {
        clean_empty_dirs: ctx.config.behavior.clean_empty_dirs,
    };
    let mut reporter = ConsoleReporter::new(messages);
    let report = Remover::new(&mut store, &mut reporter, options).run()?;

    println!();
    if report.tracking_file_removed {
        println!("{}", messages.tracking_file_removed());
    }
    println!("{} {}", "OK".green().bold(), messages.removal_complete());
    println!(
        "   {}",
        messages.files_removed(report.removed.len() + report.already_missing.len())
    );

    if !report.is_complete() {
        return Err(CliError::user(messages.files_failed(report.failed.len())));
    }
    Ok(())
}
