//! Middleware configuration.
//!
//! # Example
//!
//! ```toml
//! uri_prefix = "/assets/"           # Public URI prefix for asset directories
//! cache = true                      # Send validators, answer 304 when fresh
//! minify = false                    # Minify CSS/JS, sanitize SVG
//! lookup = "keyed"                  # "keyed" | "prefix_scan"
//! allowed_media_types = ["text/*"]  # Glob allow-list, empty = everything
//!
//! [[directories]]
//! path = "public"
//! key = "v2"                        # Optional, derived from the path if omitted
//!
//! [[files]]
//! uri = "/favicon.ico"
//! path = "public/favicon.ico"
//! attachment = false
//! ```
//!
//! Relative paths are resolved against the directory of the config file
//! (or the current directory for configs parsed from a string).

mod error;

pub use error::ConfigError;

use crate::log;
use crate::store::Lookup;
use crate::utils::url;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_URI_PREFIX: &str = "/assets/";

/// Root configuration of the asset middleware.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Base directory for relative paths (internal use only).
    #[serde(skip)]
    pub root: PathBuf,

    /// URI prefix the directories are served under.
    pub uri_prefix: String,

    /// Emit cache validators and answer conditional requests.
    pub cache: bool,

    /// Minify CSS/JS and sanitize SVG.
    pub minify: bool,

    /// How request paths are mapped to directories.
    pub lookup: Lookup,

    /// Glob patterns over media types, e.g. `image/*`.
    pub allowed_media_types: Vec<String>,

    pub directories: Vec<DirectoryConfig>,

    pub files: Vec<FileConfig>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            uri_prefix: DEFAULT_URI_PREFIX.to_string(),
            cache: true,
            minify: false,
            lookup: Lookup::default(),
            allowed_media_types: Vec::new(),
            directories: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// A `[[directories]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub key: Option<String>,
}

/// A `[[files]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub uri: String,
    pub path: PathBuf,
    #[serde(default)]
    pub attachment: bool,
}

impl AssetsConfig {
    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            log!("config"; "ignoring unknown fields: {}", ignored.join(", "));
        }
        Ok(config)
    }

    /// Load configuration from a file. Relative paths are resolved against
    /// the file's parent directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!("config"; "{}: ignoring unknown fields: {}", path.display(), ignored.join(", "));
        }

        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Join a configured path onto the config root.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Check the parts of the configuration that do not touch the filesystem.
    ///
    /// Directories and files are checked when they are registered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.uri_prefix.starts_with('/') {
            return Err(ConfigError::validation(format!(
                "uri_prefix `{}` must start with `/`",
                self.uri_prefix
            )));
        }

        for pattern in &self.allowed_media_types {
            glob::Pattern::new(pattern).map_err(|e| {
                ConfigError::validation(format!(
                    "allowed_media_types: invalid pattern `{pattern}`: {e}"
                ))
            })?;
        }

        let mut keys = FxHashSet::default();
        for dir in &self.directories {
            if dir.path.as_os_str().is_empty() {
                return Err(ConfigError::validation("directories: `path` must not be empty"));
            }
            let Some(key) = &dir.key else { continue };
            if key.is_empty() {
                return Err(ConfigError::validation(format!(
                    "directories: key for `{}` must not be empty",
                    dir.path.display()
                )));
            }
            if url::has_separator(key) {
                return Err(ConfigError::validation(format!(
                    "directories: key `{key}` must not contain path separators"
                )));
            }
            if !keys.insert(key.as_str()) {
                return Err(ConfigError::validation(format!(
                    "directories: duplicate key `{key}`"
                )));
            }
        }

        for file in &self.files {
            if !file.uri.starts_with('/') {
                return Err(ConfigError::validation(format!(
                    "files: uri `{}` must start with `/`",
                    file.uri
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub fn test_parse_config(content: &str) -> AssetsConfig {
    let (parsed, ignored) = AssetsConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
