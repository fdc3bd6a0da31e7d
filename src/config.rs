// src/config.rs

//! Run configuration
//!
//! Every field has a default. A JSON file can override the defaults and the
//! command line overrides both.

use crate::error::{Error, Result};
use crate::packages::deb::DEFAULT_STATUS_PATH;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default command listing manually installed packages, one name per line
pub const DEFAULT_INSTALLED_COMMAND: &str = "aptitude search '~i !~M' -F '%p'";

/// Default installer used in generated scripts
pub const DEFAULT_INSTALLER: &str = "apt-get";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path or URL of the distribution manifest
    pub manifest: Option<String>,

    /// Directory receiving package lists and scripts
    pub output_dir: PathBuf,

    /// Reuse previously generated `manifest.pkgs.txt` / `installed.pkgs.txt`
    pub cache: bool,

    /// Shell command printing installed package names
    pub installed_command: String,

    /// Read installed package names from this file instead of running a command
    pub installed_file: Option<PathBuf>,

    /// dpkg status database used as the dependency graph
    pub status_file: PathBuf,

    /// Program prefixed to every generated directive
    pub installer: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: None,
            output_dir: PathBuf::from("."),
            cache: false,
            installed_command: DEFAULT_INSTALLED_COMMAND.to_string(),
            installed_file: None,
            status_file: PathBuf::from(DEFAULT_STATUS_PATH),
            installer: DEFAULT_INSTALLER.to_string(),
        }
    }
}

impl Config {
    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot produce a run
    pub fn validate(&self) -> Result<()> {
        if self.installer.trim().is_empty() {
            return Err(Error::Config("installer must not be empty".to_string()));
        }
        if self.installed_file.is_none() && self.installed_command.trim().is_empty() {
            return Err(Error::Config(
                "installed_command must not be empty when no installed_file is given".to_string(),
            ));
        }
        if self.manifest.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(Error::Config("manifest must not be empty".to_string()));
        }
        Ok(())
    }
}
