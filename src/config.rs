//! TOML configuration file
//!
//! Supplies defaults for anything the command line does not set:
//!
//! ```toml
//! [session]
//! driver = "dummy:devices=2"
//! integration_time_us = 10000
//! verbose = true
//! connect_settle_ms = 200
//! config_settle_ms = 100
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use oceanctl_session::SessionOptions;
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "oceanctl.toml";

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unexpected keys
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level file structure
#[derive(Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub session: SessionSection,
}

/// `[session]` table
#[derive(Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    pub driver: Option<String>,
    pub integration_time_us: Option<u32>,
    pub verbose: Option<bool>,
    pub connect_settle_ms: Option<u64>,
    pub config_settle_ms: Option<u64>,
}

impl FileConfig {
    /// Load the configuration
    ///
    /// An explicit path must exist. Without one, `oceanctl.toml` in the
    /// working directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Session options with file values applied over the defaults
    pub fn session_options(&self) -> SessionOptions {
        let s = &self.session;
        let mut options = SessionOptions::default();
        if let Some(verbose) = s.verbose {
            options.verbose = verbose;
        }
        if let Some(us) = s.integration_time_us {
            options.integration_time_us = us;
        }
        if let Some(ms) = s.connect_settle_ms {
            options.connect_settle = Duration::from_millis(ms);
        }
        if let Some(ms) = s.config_settle_ms {
            options.config_settle = Duration::from_millis(ms);
        }
        options
    }
}
