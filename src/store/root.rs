//! Registered asset roots.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Key identifying a registered root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootKey(String);

impl RootKey {
    pub(super) fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RootKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A local directory tree eligible to serve assets.
///
/// Invariant: `path` is canonical (symlinks resolved) and was a readable
/// directory at registration time.
#[derive(Debug, Clone)]
pub struct AssetRoot {
    key: RootKey,
    path: PathBuf,
}

impl AssetRoot {
    pub(super) fn new(key: RootKey, path: PathBuf) -> Self {
        Self { key, path }
    }

    pub fn key(&self) -> &RootKey {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Join `relative` under this root and canonicalize.
    ///
    /// Returns `None` unless the result is an existing file that still lies
    /// under the root after symlink and `..` resolution.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = relative.trim_start_matches(['/', '\\']);
        if relative.is_empty() {
            return None;
        }

        let canonical = self.path.join(relative).canonicalize().ok()?;
        if !canonical.starts_with(&self.path) {
            return None;
        }

        canonical.is_file().then_some(canonical)
    }
}

/// How the part of a request path after the URI prefix selects a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    /// `{key}/{relative}`: the first segment names the root.
    #[default]
    Keyed,
    /// `{relative}`: roots are tried in registration order, first hit wins.
    PrefixScan,
}
