//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ctx-tool - Install and remove shared Claude configuration trees
#[derive(Parser, Debug)]
#[command(name = "ctx-tool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default is ~/.config/ctx-tool/config.yaml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Message language (en, zh-Hans)
    #[arg(short, long, global = true, value_name = "LANG")]
    pub lang: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install configuration directories from the repository
    ///
    /// Examples:
    ///   ctx-tool add --all
    ///   ctx-tool add PRPs .claude
    ///   ctx-tool add --global .claude
    ///   ctx-tool add --all --source ./checkout
    Add(AddArgs),

    /// Remove every file recorded by a previous install
    ///
    /// Examples:
    ///   ctx-tool remove
    ///   ctx-tool remove --global --force
    Remove {
        /// Remove the global installation
        #[arg(long)]
        global: bool,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Show what is currently installed
    Status {
        /// Show the global installation
        #[arg(long)]
        global: bool,

        /// Output the tracking record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Top-level directories to install
    #[arg(required_unless_present = "all")]
    pub dirs: Vec<String>,

    /// Install every allowed directory
    #[arg(long, conflicts_with = "dirs")]
    pub all: bool,

    /// Install into ~/.claude
    #[arg(long, conflicts_with = "project")]
    pub global: bool,

    /// Install into the current directory (default)
    #[arg(long)]
    pub project: bool,

    /// Use a local directory instead of cloning the repository
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,
}
