//! Configuration file discovery and environment overrides
//!
//! The resolver picks exactly one configuration file, the first that exists
//! in this order:
//! 1. An explicit path given on the command line
//! 2. `<config_dir>/ctx-tool/config.yaml`
//! 3. `~/.ctx-tool.yaml` (legacy)
//! 4. `./.ctx-tool.yaml` (legacy)
//!
//! Environment variables prefixed with `CTX_TOOL_` are applied on top.

use super::{Config, DEFAULT_CONFIG_TEMPLATE};
use crate::{Error, Result};
use ctx_fs::{ConfigStore, io};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application directory name under the platform config directory.
pub const APP_NAME: &str = "ctx-tool";

/// File name inside the application config directory.
pub const XDG_CONFIG_FILE: &str = "config.yaml";

/// File name of the legacy home and working-directory config files.
pub const LEGACY_CONFIG_FILE: &str = ".ctx-tool.yaml";

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "CTX_TOOL_";

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path passed explicitly by the caller
    Explicit(PathBuf),
    /// Platform config directory
    Xdg(PathBuf),
    /// Legacy dotfile that should be migrated
    Legacy(PathBuf),
    /// No file existed; a default file was written here
    CreatedDefault(PathBuf),
    /// No file existed and none could be written
    Defaults,
}

impl ConfigSource {
    /// The file backing this configuration, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Xdg(p) | Self::Legacy(p) | Self::CreatedDefault(p) => Some(p),
            Self::Defaults => None,
        }
    }
}

/// Effective configuration plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Locates, loads and overrides the ctx-tool configuration.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    explicit: Option<PathBuf>,
    /// Override for the platform config directory (used for testing).
    config_dir_override: Option<PathBuf>,
    home_dir_override: Option<PathBuf>,
    current_dir_override: Option<PathBuf>,
    /// Override for the process environment (used for testing).
    env_override: Option<HashMap<String, String>>,
}

impl ConfigResolver {
    /// Create a resolver that searches the default locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of searching. A missing explicit file is an
    /// error rather than a fallback to defaults.
    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir_override = Some(dir.into());
        self
    }

    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir_override = Some(dir.into());
        self
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir_override = Some(dir.into());
        self
    }

    /// Replace the process environment with `vars`.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_override = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Path of the preferred config file, `<config_dir>/ctx-tool/config.yaml`.
    pub fn xdg_config_path(&self) -> Option<PathBuf> {
        let dir = match &self.config_dir_override {
            Some(dir) => Some(dir.clone()),
            None => dirs::config_dir(),
        };
        dir.map(|d| d.join(APP_NAME).join(XDG_CONFIG_FILE))
    }

    fn home_dir(&self) -> Option<PathBuf> {
        match &self.home_dir_override {
            Some(dir) => Some(dir.clone()),
            None => dirs::home_dir(),
        }
    }

    fn current_dir(&self) -> Option<PathBuf> {
        match &self.current_dir_override {
            Some(dir) => Some(dir.clone()),
            None => std::env::current_dir().ok(),
        }
    }

    fn env(&self) -> HashMap<String, String> {
        match &self.env_override {
            Some(vars) => vars.clone(),
            None => std::env::vars()
                .filter(|(key, _)| key.starts_with(ENV_PREFIX))
                .collect(),
        }
    }

    /// Candidate files in priority order.
    fn candidates(&self) -> Vec<ConfigSource> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(path) = self.xdg_config_path() {
            candidates.push(ConfigSource::Xdg(path));
        }
        if let Some(home) = self.home_dir() {
            candidates.push(ConfigSource::Legacy(home.join(LEGACY_CONFIG_FILE)));
        }
        if let Some(cwd) = self.current_dir() {
            candidates.push(ConfigSource::Legacy(cwd.join(LEGACY_CONFIG_FILE)));
        }
        candidates
    }

    /// Resolve the effective configuration.
    ///
    /// When no file exists anywhere, a commented default file is written to
    /// the platform config directory. Failing to write it only costs the
    /// user a template, so it is logged and defaults are used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] for a missing explicit path, a
    /// parse error for invalid YAML, and [`Error::InvalidConfigValue`] for a
    /// malformed environment override.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let (mut config, source) = match &self.explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(Error::ConfigNotFound { path: path.clone() });
                }
                tracing::debug!(?path, "Loading explicit config");
                (load_file(path)?, ConfigSource::Explicit(path.clone()))
            }
            None => self.resolve_from_search()?,
        };

        apply_env_overrides(&mut config, &self.env())?;
        Ok(ResolvedConfig { config, source })
    }

    fn resolve_from_search(&self) -> Result<(Config, ConfigSource)> {
        for candidate in self.candidates() {
            let Some(path) = candidate.path() else {
                continue;
            };
            if !path.is_file() {
                tracing::debug!(?path, "No config here, skipping");
                continue;
            }

            tracing::debug!(?path, "Loading config");
            if let ConfigSource::Legacy(legacy) = &candidate {
                tracing::info!(
                    legacy = %legacy.display(),
                    target = ?self.xdg_config_path(),
                    "Using legacy config location; consider moving it"
                );
            }
            let config = load_file(path)?;
            return Ok((config, candidate));
        }

        match self.ensure_default_file() {
            Ok(Some(path)) => Ok((Config::default(), ConfigSource::CreatedDefault(path))),
            Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not create default config file");
                Ok((Config::default(), ConfigSource::Defaults))
            }
        }
    }

    /// Write the default template to the platform config path unless a file
    /// is already there.
    ///
    /// Returns the path written, or `None` if no platform config directory
    /// is known or the file already existed.
    pub fn ensure_default_file(&self) -> Result<Option<PathBuf>> {
        let Some(path) = self.xdg_config_path() else {
            return Ok(None);
        };
        if path.exists() {
            return Ok(None);
        }

        io::write_atomic(&path, DEFAULT_CONFIG_TEMPLATE.as_bytes())?;
        tracing::debug!(?path, "Wrote default config");
        Ok(Some(path))
    }
}

fn load_file(path: &Path) -> Result<Config> {
    // An empty file means "all defaults".
    if io::read_text(path)?.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(ConfigStore::new().load(path)?)
}

fn apply_env_overrides(config: &mut Config, env: &HashMap<String, String>) -> Result<()> {
    let var = |suffix: &str| {
        env.get(&format!("{ENV_PREFIX}{suffix}"))
            .map(|value| (format!("{ENV_PREFIX}{suffix}"), value.trim().to_string()))
    };

    if let Some((_, url)) = var("REPOSITORY_URL") {
        config.repository.url = url;
    }
    if let Some((_, branch)) = var("REPOSITORY_BRANCH") {
        config.repository.branch = branch;
    }
    if let Some((_, file)) = var("TRACKING_FILE") {
        config.tracking.file = file;
    }
    if let Some((_, allowed)) = var("DIRECTORIES_ALLOWED") {
        config.directories.allowed = allowed
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some((key, value)) = var("BEHAVIOR_BACKUP_ON_CONFLICT") {
        config.behavior.backup_on_conflict = parse_bool(&key, &value)?;
    }
    if let Some((key, value)) = var("BEHAVIOR_VERIFY_MD5") {
        config.behavior.verify_md5 = parse_bool(&key, &value)?;
    }
    if let Some((key, value)) = var("BEHAVIOR_CLEAN_EMPTY_DIRS") {
        config.behavior.clean_empty_dirs = parse_bool(&key, &value)?;
    }
    if let Some((_, language)) = var("I18N_LANGUAGE") {
        config.i18n.language = language;
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
