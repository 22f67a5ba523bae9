//! The status command: show the tracked installation

use colored::Colorize;
use ctx_core::{Scope, TrackingStore};

use crate::context::AppContext;
use crate::error::Result;

/// Run the status command
pub fn run_status(ctx: &AppContext, global: bool, json: bool) -> Result<()> {
    let messages = &ctx.messages;
    let scope = if global { Scope::Global } else { Scope::Project };
    let target = ctx.target(scope)?;

    if !target.tracking_file.is_file() {
        if json {
            println!("null");
        } else {
            println!("{}", messages.no_installation(target.tracking_file.display()));
        }
        return Ok(());
    }

    let store = TrackingStore::open(&target.tracking_file)?;
    let installation = store.installation();

    if json {
        println!("{}", serde_json::to_string_pretty(installation)?);
        return Ok(());
    }

    println!("{}", messages.installation_scope(installation.scope));
    println!("{}", messages.base_path(installation.base_path.display()));
    println!("{}", messages.installed_at(installation.created_at.to_rfc3339()));
    println!("{}", messages.tracking_file(target.tracking_file.display()));
    println!();
    println!("{}", messages.files_tracked(store.len()).bold());

    let mut records: Vec<_> = installation.files.iter().collect();
    records.sort_by(|a, b| a.path.cmp(&b.path));
    for record in records {
        println!(
            "   {} {} {}",
            "-".dimmed(),
            record.path,
            format!("({} B, {})", record.size, short_digest(record.digest.as_str())).dimmed()
        );
    }

    Ok(())
}

fn short_digest(hex: &str) -> &str {
    hex.get(..8).unwrap_or(hex)
}
