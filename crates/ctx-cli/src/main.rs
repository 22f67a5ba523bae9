//! ctx-tool CLI
//!
//! Installs shared configuration directories into a project or the user's
//! home, remembers every file it wrote, and removes exactly those files again.

mod cli;
mod commands;
mod console;
mod context;
mod error;
mod interactive;
mod messages;
mod source;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log to stderr. `--verbose` forces debug; otherwise `RUST_LOG` decides,
/// falling back to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();

    tracing::debug!("Verbose mode enabled");
}

fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::from_cli(&cli)?;

    match &cli.command {
        Commands::Add(args) => commands::run_add(&ctx, args),
        Commands::Remove { global, force } => commands::run_remove(&ctx, *global, *force),
        Commands::Status { global, json } => commands::run_status(&ctx, *global, *json),
    }
}
