//! Resolved asset descriptor.

use crate::utils::mime;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Where the bytes of an asset come from.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// Canonical path under a registered root.
    File(PathBuf),
    /// In-memory content with no filesystem backing.
    Memory(Arc<[u8]>),
}

/// An asset matched by a resolver for one request.
///
/// Built fresh per request: the filesystem is the source of truth, so size
/// and mtime are read at resolve time and never cached.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub source: AssetSource,
    /// File name used for `Content-Disposition`.
    pub name: String,
    /// Bare media type, e.g. `text/css`.
    pub media_type: String,
    pub size: Option<u64>,
    /// `None` disables cache validation for this asset.
    pub mtime: Option<SystemTime>,
    /// Serve with `Content-Disposition: attachment`.
    pub attachment: bool,
}

impl ResolvedAsset {
    /// Describe a file on disk. Size and mtime are `None` if `stat` fails.
    pub fn from_file(path: PathBuf) -> Self {
        let metadata = path.metadata().ok();
        let size = metadata.as_ref().map(std::fs::Metadata::len);
        let mtime = metadata.and_then(|m| m.modified().ok());

        Self {
            name: file_name(&path),
            media_type: mime::from_path(&path).to_string(),
            size,
            mtime,
            attachment: false,
            source: AssetSource::File(path),
        }
    }

    /// Describe in-memory content. The media type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let data = data.into();
        Self {
            media_type: mime::from_path(Path::new(&name)).to_string(),
            size: Some(data.len() as u64),
            mtime: None,
            attachment: false,
            source: AssetSource::Memory(data),
            name,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn with_attachment(mut self, attachment: bool) -> Self {
        self.attachment = attachment;
        self
    }

    /// Filesystem path, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            AssetSource::File(path) => Some(path),
            AssetSource::Memory(_) => None,
        }
    }

    /// Path used in diagnostics: the file path, or the name for in-memory assets.
    pub fn diagnostic_path(&self) -> PathBuf {
        self.path()
            .map_or_else(|| PathBuf::from(&self.name), Path::to_path_buf)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
