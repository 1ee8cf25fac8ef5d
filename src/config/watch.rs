//! What to watch: the content directory and the file-name pattern.

use std::path::{Path, PathBuf};

use regex::Regex;

use super::ConfigError;

/// Default pattern: markdown, HTML and CSS files.
pub const DEFAULT_PATTERN: &str = r"\.(md|markdown|html?|css)$";

/// Immutable (root, pattern) pair shared by every reload session.
///
/// Built once at startup. The pattern is compiled and the root is verified
/// here, so a bad value never reaches a running watcher.
#[derive(Debug, Clone)]
pub struct WatchSpec {
    root: PathBuf,
    pattern: Regex,
}

impl WatchSpec {
    pub fn new(root: impl AsRef<Path>, pattern: &str) -> Result<Self, ConfigError> {
        let pattern =
            Regex::new(pattern).map_err(|e| ConfigError::Pattern(pattern.to_string(), e))?;

        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|e| ConfigError::Root(root.to_path_buf(), e))?;
        if !canonical.is_dir() {
            return Err(ConfigError::NotADirectory(root.to_path_buf()));
        }
        // Fail now rather than on the first watch attempt.
        std::fs::read_dir(&canonical).map_err(|e| ConfigError::Root(root.to_path_buf(), e))?;

        Ok(Self {
            root: canonical,
            pattern,
        })
    }

    /// Canonical content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}
