//! Server configuration: `hotserve.toml` merged with command-line flags.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8080                 # HTTP port number
//!
//! [watch]
//! root = "./"                 # Directory served and watched (non-recursive)
//! pattern = '\.(md|css)$'     # Regex matched against changed paths
//! ```
//!
//! Precedence: CLI flag > config file > default. A missing config file is
//! not an error.

mod error;
mod watch;

pub use error::ConfigError;
pub use watch::{DEFAULT_PATTERN, WatchSpec};

use crate::{cli::Cli, debug};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
};

/// Root configuration structure representing hotserve.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub serve: ServeConfig,
    pub watch: WatchConfig,
}

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,
    /// HTTP port number.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8080,
        }
    }
}

/// Change detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Content root, served over HTTP and watched for changes.
    pub root: PathBuf,
    /// Regular expression matched against changed paths.
    pub pattern: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./"),
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl Config {
    /// Load config file (if present) and apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&cli.config)?.unwrap_or_default();
        config.apply_cli(cli);
        Ok(config)
    }

    /// Read a config file. Returns `Ok(None)` when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("config"; "{} not found, using defaults", path.display());
                return Ok(None);
            }
            Err(e) => return Err(ConfigError::Io(path.to_path_buf(), e)),
        };

        let mut config = Self::parse(&content)?;

        // Relative roots in a config file are relative to the file itself.
        if config.watch.root.is_relative()
            && let Some(parent) = path.parent()
        {
            config.watch.root = parent.join(&config.watch.root);
        }

        debug!("config"; "loaded {}", path.display());
        Ok(Some(config))
    }

    /// Parse TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.dir {
            self.watch.root = dir.clone();
        }
        if let Some(pattern) = &cli.pattern {
            self.watch.pattern = pattern.clone();
        }
        if let Some(interface) = cli.interface {
            self.serve.interface = interface;
        }
        if let Some(port) = cli.port {
            self.serve.port = port;
        }
    }

    /// Compile the watch section into a validated [`WatchSpec`].
    pub fn watch_spec(&self) -> Result<WatchSpec, ConfigError> {
        WatchSpec::new(&self.watch.root, &self.watch.pattern)
    }
}
