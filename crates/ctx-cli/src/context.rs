//! Per-invocation context
//!
//! Resolves configuration and message language once, before any command runs.

use colored::Colorize;
use ctx_core::{Config, ConfigResolver, ConfigSource, InstallTarget, Scope};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::Result;
use crate::messages::{Language, Messages};

/// Everything a command needs besides its own arguments.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub config_source: ConfigSource,
    pub messages: Messages,
    pub home: Option<PathBuf>,
}

impl AppContext {
    /// Resolve configuration honouring `--config` and pick the language
    /// honouring `--lang`.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut resolver = ConfigResolver::new();
        if let Some(path) = &cli.config {
            resolver = resolver.with_explicit_path(path);
        }
        let resolved = resolver.resolve()?;

        let language = Language::resolve(
            cli.lang.as_deref(),
            &resolved.config.i18n.language,
            |key| std::env::var(key).ok(),
        );
        let context = Self {
            config: resolved.config,
            config_source: resolved.source,
            messages: Messages::new(language),
            home: dirs::home_dir(),
        };

        match &context.config_source {
            ConfigSource::Legacy(path) => {
                let target = resolver
                    .xdg_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                eprintln!(
                    "{} {}",
                    "NOTE".cyan().bold(),
                    context.messages.legacy_config(path.display(), target)
                );
            }
            ConfigSource::CreatedDefault(path) => {
                eprintln!(
                    "{} {}",
                    "NOTE".cyan().bold(),
                    context.messages.created_default_config(path.display())
                );
            }
            source => tracing::debug!(?source, "Configuration resolved"),
        }

        Ok(context)
    }

    /// Destination and tracking file for `scope`.
    pub fn target(&self, scope: Scope) -> Result<InstallTarget> {
        Ok(InstallTarget::resolve(scope, &self.config, self.home.as_deref())?)
    }
}
