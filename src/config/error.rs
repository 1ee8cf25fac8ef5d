//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("invalid watch pattern `{0}`")]
    Pattern(String, #[source] regex::Error),

    #[error("cannot read content root `{0}`")]
    Root(PathBuf, #[source] std::io::Error),

    #[error("content root `{0}` is not a directory")]
    NotADirectory(PathBuf),
}
