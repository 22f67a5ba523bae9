//! Installation scopes and where each one installs to

use crate::config::Config;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory under the home directory that receives global installs.
pub const GLOBAL_DIR_NAME: &str = ".claude";

/// Tracking file name used for global installs, placed in the home directory.
pub const GLOBAL_TRACKING_FILE: &str = ".ctx-tool-tracking.json";

/// Which destination convention produced an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// User-wide install into `~/.claude`
    Global,
    /// Install into the current working directory
    #[default]
    Project,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "project" => Ok(Self::Project),
            _ => Err(Error::InvalidScope {
                scope: s.to_string(),
            }),
        }
    }
}

/// Destination root and tracking file for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub scope: Scope,
    pub base_path: PathBuf,
    pub tracking_file: PathBuf,
}

impl InstallTarget {
    /// Resolve the target for `scope`.
    ///
    /// Project installs go to `.` and track in `config.tracking.file`, both
    /// relative to the working directory. Global installs go to
    /// `<home>/.claude` and track in `<home>/.ctx-tool-tracking.json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHomeDir`] for a global target when `home` is `None`.
    pub fn resolve(scope: Scope, config: &Config, home: Option<&Path>) -> Result<Self> {
        let target = match scope {
            Scope::Project => Self {
                scope,
                base_path: PathBuf::from("."),
                tracking_file: PathBuf::from(&config.tracking.file),
            },
            Scope::Global => {
                let home = home.ok_or(Error::NoHomeDir)?;
                Self {
                    scope,
                    base_path: home.join(GLOBAL_DIR_NAME),
                    tracking_file: home.join(GLOBAL_TRACKING_FILE),
                }
            }
        };

        tracing::debug!(
            scope = %target.scope,
            base_path = %target.base_path.display(),
            tracking_file = %target.tracking_file.display(),
            "Resolved install target"
        );
        Ok(target)
    }

    /// Create the destination root if it does not exist yet.
    pub fn ensure_base_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)
            .map_err(|e| ctx_fs::Error::io(&self.base_path, e))?;
        Ok(())
    }
}
