//! The add command: install configuration directories

use colored::Colorize;
use ctx_core::{Scope, StoreState, SyncEngine, SyncSummary, TrackingStore};

use crate::cli::AddArgs;
use crate::console::ConsoleReporter;
use crate::context::AppContext;
use crate::error::Result;
use crate::source::Source;

/// Run the add command
///
/// Requested directories are validated before anything is written. Once
/// files start landing, tracking is saved even when the sync stops on an
/// error, so every file that did get installed stays removable.
pub fn run_add(ctx: &AppContext, args: &AddArgs) -> Result<()> {
    let messages = &ctx.messages;
    let scope = if args.global { Scope::Global } else { Scope::Project };
    let target = ctx.target(scope)?;

    println!("{}", messages.installation_scope(scope));
    println!("{}", messages.target_directory(target.base_path.display()));

    let source = match &args.source {
        Some(path) => {
            let source = Source::local(path, || messages.source_not_a_directory(path.display()))?;
            println!("{}", messages.using_local_source(path.display()));
            source
        }
        None => {
            let repository = &ctx.config.repository;
            println!(
                "{} {}",
                "=>".blue().bold(),
                messages.cloning_repository(&repository.url, &repository.branch)
            );
            let source = Source::clone_repository(&repository.url, &repository.branch)?;
            println!("{}", messages.repository_cloned(source.root().display()));
            source
        }
    };

    let settings = ctx.config.sync_settings();
    for dir in &args.dirs {
        settings.check_directory(source.root(), dir)?;
    }
    if scope == Scope::Global {
        target.ensure_base_dir()?;
    }

    let mut store = TrackingStore::new(&target.tracking_file, scope, &target.base_path);
    store.load()?;

    let mut reporter = ConsoleReporter::new(messages);
    let mut engine = SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .with_source_label(source.label());

    let synced: ctx_core::Result<SyncSummary> = if args.all {
        println!("{} {}", "=>".blue().bold(), messages.syncing_all());
        engine.sync_all()
    } else {
        args.dirs.iter().try_fold(SyncSummary::default(), |mut summary, dir| {
            summary.merge(engine.sync_directory(dir)?);
            Ok(summary)
        })
    };

    if synced.is_ok() || store.state() == StoreState::Mutated {
        store.save()?;
    }
    let summary = synced?;

    println!();
    println!("{} {}", "OK".green().bold(), messages.installation_complete());
    println!(
        "   {}",
        messages.sync_summary(summary.installed, summary.skipped, summary.backed_up)
    );
    println!("   {}", messages.tracking_file_saved(target.tracking_file.display()));
    println!("   {}", messages.files_tracked(store.len()));

    Ok(())
}
