//! Asset error types.
//!
//! Registration errors are raised while configuring a store or resolver and
//! are fatal to setup. Runtime errors are raised while building a response for
//! a request that did match an asset, and always carry the offending path.
//! Resolution misses are not errors: they surface as `None` / pass-through.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------
    #[error("assets directory `{}` does not exist or is not a readable directory", path.display())]
    InvalidDirectory { path: PathBuf },

    #[error("assets directory key `{key}` is already registered")]
    DuplicateKey { key: String },

    #[error("assets directory key must not be empty")]
    EmptyKey,

    #[error("assets directory key `{key}` must not contain path separators")]
    InvalidKey { key: String },

    #[error("`{}` is not a readable asset file", path.display())]
    NotAnAsset { path: PathBuf },

    // ------------------------------------------------------------------------
    // Runtime
    // ------------------------------------------------------------------------
    #[error("unable to read asset `{}`", path.display())]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("media type `{media_type}` of asset `{}` is not allowed", path.display())]
    DisallowedMediaType { path: PathBuf, media_type: String },

    #[error("unable to sanitize SVG asset `{}`: {reason}", path.display())]
    Sanitize { path: PathBuf, reason: String },
}

impl AssetError {
    /// Whether this error is raised at registration time.
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            Self::InvalidDirectory { .. }
                | Self::DuplicateKey { .. }
                | Self::EmptyKey
                | Self::InvalidKey { .. }
                | Self::NotAnAsset { .. }
        )
    }

    /// Path of the asset or directory the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::InvalidDirectory { path }
            | Self::NotAnAsset { path }
            | Self::AssetRead { path, .. }
            | Self::DisallowedMediaType { path, .. }
            | Self::Sanitize { path, .. } => Some(path),
            Self::DuplicateKey { .. } | Self::EmptyKey | Self::InvalidKey { .. } => None,
        }
    }
}
