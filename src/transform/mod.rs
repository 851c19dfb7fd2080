//! Content transformation for resolved assets.
//!
//! | media type                                   | transformation              |
//! |----------------------------------------------|-----------------------------|
//! | `text/css`                                   | lightningcss minify         |
//! | `text/javascript`, `application/javascript`  | oxc minify, no mangling     |
//! | `image/svg+xml`                              | sanitize + whitespace minify |
//! | anything else                                | raw bytes                   |
//!
//! Untransformed files are streamed from disk, never buffered.

mod minify;
mod svg;

pub use minify::{minify_css, minify_js};
pub use svg::sanitize_svg;

use crate::debug;
use crate::error::AssetError;
use crate::resolve::{AssetSource, ResolvedAsset};
use crate::response::Body;
use crate::utils::mime::types;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

/// Transformation selected for a media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    Css,
    Js,
    Svg,
}

impl Transform {
    /// Exact, case-sensitive match on the bare media type.
    pub fn for_media_type(media_type: &str) -> Self {
        match media_type {
            types::CSS => Self::Css,
            types::JAVASCRIPT | types::APPLICATION_JAVASCRIPT => Self::Js,
            types::SVG => Self::Svg,
            _ => Self::Identity,
        }
    }

    /// Transformation applied when minification is `enabled`.
    pub fn select(media_type: &str, enabled: bool) -> Self {
        if enabled {
            Self::for_media_type(media_type)
        } else {
            Self::Identity
        }
    }
}

/// Build the response body for `asset`.
pub fn transform(asset: &ResolvedAsset, minify: bool) -> Result<Body, AssetError> {
    let kind = Transform::select(&asset.media_type, minify);

    match (&asset.source, kind) {
        (AssetSource::File(path), Transform::Identity) => open(path),
        (AssetSource::Memory(data), Transform::Identity) => Ok(Body::Shared(Arc::clone(data))),
        (source, kind) => {
            let raw = match source {
                AssetSource::File(path) => read(path)?,
                AssetSource::Memory(data) => data.to_vec(),
            };
            apply(asset, kind, raw).map(Body::Bytes)
        }
    }
}

fn apply(asset: &ResolvedAsset, kind: Transform, raw: Vec<u8>) -> Result<Vec<u8>, AssetError> {
    match kind {
        Transform::Identity => Ok(raw),
        Transform::Css => Ok(minify_text(asset, raw, minify_css)),
        Transform::Js => {
            let is_module = asset.name.ends_with(".mjs");
            Ok(minify_text(asset, raw, |src| minify_js(src, is_module)))
        }
        Transform::Svg => sanitize_svg(&raw).map_err(|reason| AssetError::Sanitize {
            path: asset.diagnostic_path(),
            reason,
        }),
    }
}

/// Run a text minifier, falling back to the raw bytes when it declines.
fn minify_text(
    asset: &ResolvedAsset,
    raw: Vec<u8>,
    minifier: impl FnOnce(&str) -> Option<String>,
) -> Vec<u8> {
    let Ok(source) = std::str::from_utf8(&raw) else {
        debug!("minify"; "{} is not valid UTF-8, serving as-is", asset.name);
        return raw;
    };
    match minifier(source) {
        Some(minified) => minified.into_bytes(),
        None => {
            debug!("minify"; "failed to parse {}, serving as-is", asset.name);
            raw
        }
    }
}

fn open(path: &Path) -> Result<Body, AssetError> {
    let read_error = |source| AssetError::AssetRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_error)?;
    let len = file.metadata().map_err(read_error)?.len();
    Ok(Body::File { file, len })
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    fs::read(path).map_err(|source| AssetError::AssetRead {
        path: path.to_path_buf(),
        source,
    })
}
