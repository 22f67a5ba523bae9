//! Configuration for ctx-tool
//!
//! [`Config`] mirrors the YAML file users edit. Every section carries serde
//! defaults, so a partial file only overrides what it names.
//! [`ConfigResolver`] decides which file to read and applies environment
//! overrides on top.

mod resolver;

pub use resolver::{
    APP_NAME, ConfigResolver, ConfigSource, ENV_PREFIX, LEGACY_CONFIG_FILE, ResolvedConfig,
    XDG_CONFIG_FILE,
};

use crate::sync::SyncSettings;
use serde::{Deserialize, Serialize};

/// Default upstream repository holding the configuration trees.
pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/Wirasm/PRPs-agentic-eng";

/// Default branch checked out from the upstream repository.
pub const DEFAULT_BRANCH: &str = "development";

/// Default tracking file name for project installs.
pub const DEFAULT_TRACKING_FILE: &str = ".ctx-tool-tracking.json";

/// Commented template written when no config file exists anywhere.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ctx-tool configuration
# Location: ~/.config/ctx-tool/config.yaml

version: "1.0"

# Where configuration trees are fetched from
repository:
  url: "https://github.com/Wirasm/PRPs-agentic-eng"
  branch: "development"  # "main" for the stable line

# Tracking file for project installs
tracking:
  file: ".ctx-tool-tracking.json"

# Top-level directories that may be installed
directories:
  allowed:
    - ".claude"
    - "PRPs"
    - "claude_md_files"

behavior:
  backup_on_conflict: true  # keep a .backup of files that differ before overwriting
  verify_md5: true          # compare content before overwriting
  clean_empty_dirs: true    # prune emptied directories on remove

i18n:
  language: ""              # "en" or "zh-Hans"; empty follows CTX_TOOL_LANG / LANG
"#;

/// Complete ctx-tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub repository: RepositoryConfig,
    pub tracking: TrackingConfig,
    pub directories: DirectoriesConfig,
    pub behavior: BehaviorConfig,
    pub i18n: I18nConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            repository: RepositoryConfig::default(),
            tracking: TrackingConfig::default(),
            directories: DirectoriesConfig::default(),
            behavior: BehaviorConfig::default(),
            i18n: I18nConfig::default(),
        }
    }
}

impl Config {
    /// Project the read-only input the sync engine works from.
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            allowed: self.directories.allowed.clone(),
            verify_checksums: self.behavior.verify_md5,
            backup_on_conflict: self.behavior.backup_on_conflict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub url: String,
    pub branch: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REPOSITORY_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub file: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_TRACKING_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoriesConfig {
    pub allowed: Vec<String>,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            allowed: vec![
                ".claude".to_string(),
                "PRPs".to_string(),
                "claude_md_files".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub backup_on_conflict: bool,
    pub verify_md5: bool,
    pub clean_empty_dirs: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            backup_on_conflict: true,
            verify_md5: true,
            clean_empty_dirs: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Preferred message language; empty defers to the environment.
    pub language: String,
}
