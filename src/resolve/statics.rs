//! Resolver for individually registered assets.

use super::{AssetResolver, ResolvedAsset};
use crate::error::AssetError;
use crate::utils::{mime, url};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Entry {
    File {
        path: PathBuf,
        attachment: bool,
    },
    Memory {
        name: String,
        media_type: String,
        data: Arc<[u8]>,
        attachment: bool,
    },
}

/// Explicit URI -> asset map.
///
/// Files are canonicalized at registration and re-checked on every request;
/// a file that disappeared is a pass-through, not an error. In-memory assets
/// have no mtime and are therefore never cache-validated.
#[derive(Debug, Default)]
pub struct StaticResolver {
    entries: Vec<(String, Entry)>,
    by_uri: FxHashMap<String, usize>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the file at `path` under `uri`.
    pub fn add_file(&mut self, uri: &str, path: impl AsRef<Path>) -> Result<(), AssetError> {
        self.add_file_entry(uri, path.as_ref(), false)
    }

    /// Serve the file at `path` under `uri` as a download.
    pub fn add_attachment(&mut self, uri: &str, path: impl AsRef<Path>) -> Result<(), AssetError> {
        self.add_file_entry(uri, path.as_ref(), true)
    }

    /// Serve in-memory content under `uri`. The media type is guessed from `name`.
    pub fn add_bytes(&mut self, uri: &str, name: &str, data: impl Into<Arc<[u8]>>) {
        self.insert(
            uri,
            Entry::Memory {
                name: name.to_string(),
                media_type: mime::from_path(Path::new(name)).to_string(),
                data: data.into(),
                attachment: false,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn add_file_entry(&mut self, uri: &str, path: &Path, attachment: bool) -> Result<(), AssetError> {
        let not_an_asset = || AssetError::NotAnAsset {
            path: path.to_path_buf(),
        };
        let canonical = path.canonicalize().map_err(|_| not_an_asset())?;
        if !canonical.is_file() {
            return Err(not_an_asset());
        }

        self.insert(
            uri,
            Entry::File {
                path: canonical,
                attachment,
            },
        );
        Ok(())
    }

    /// Later registrations replace earlier ones for the same URI.
    fn insert(&mut self, uri: &str, entry: Entry) {
        match self.by_uri.get(uri) {
            Some(&i) => self.entries[i].1 = entry,
            None => {
                self.by_uri.insert(uri.to_string(), self.entries.len());
                self.entries.push((uri.to_string(), entry));
            }
        }
    }

    fn lookup(&self, request_path: &str) -> Option<&Entry> {
        let path = url::strip_query(request_path);
        if let Some(&i) = self.by_uri.get(path) {
            return Some(&self.entries[i].1);
        }
        let decoded = url::decode_segment(path)?;
        self.by_uri.get(&decoded).map(|&i| &self.entries[i].1)
    }
}

impl AssetResolver for StaticResolver {
    fn resolve(&self, request_path: &str) -> Option<ResolvedAsset> {
        match self.lookup(request_path)? {
            Entry::File { path, attachment } => {
                if !path.is_file() {
                    return None;
                }
                Some(ResolvedAsset::from_file(path.clone()).with_attachment(*attachment))
            }
            Entry::Memory {
                name,
                media_type,
                data,
                attachment,
            } => Some(
                ResolvedAsset::from_bytes(name.clone(), Arc::clone(data))
                    .with_media_type(media_type.clone())
                    .with_attachment(*attachment),
            ),
        }
    }

    fn uri_for(&self, path: &Path) -> Option<String> {
        let canonical = path.canonicalize().ok()?;
        self.entries.iter().find_map(|(uri, entry)| match entry {
            Entry::File { path, .. } if *path == canonical => Some(uri.clone()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_static_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favicon.ico");
        fs::write(&path, [0u8; 4]).unwrap();

        let mut resolver = StaticResolver::new();
        resolver.add_file("/favicon.ico", &path).unwrap();

        let asset = resolver.resolve("/favicon.ico?x=1").unwrap();
        assert_eq!(asset.media_type, "image/x-icon");
        assert!(asset.mtime.is_some());
        assert!(resolver.resolve("/other.ico").is_none());
        assert_eq!(
            resolver.uri_for(&path).as_deref(),
            Some("/favicon.ico")
        );
    }

    #[test]
    fn test_static_file_missing_at_registration() {
        let dir = TempDir::new().unwrap();
        let mut resolver = StaticResolver::new();

        let err = resolver
            .add_file("/x.css", dir.path().join("x.css"))
            .unwrap_err();
        assert!(matches!(err, AssetError::NotAnAsset { .. }));

        let err = resolver.add_file("/dir", dir.path()).unwrap_err();
        assert!(matches!(err, AssetError::NotAnAsset { .. }));
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_static_file_removed_after_registration() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.css");
        fs::write(&path, "a{}").unwrap();

        let mut resolver = StaticResolver::new();
        resolver.add_file("/gone.css", &path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(resolver.resolve("/gone.css").is_none());
    }

    #[test]
    fn test_static_bytes_and_attachment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"%PDF").unwrap();

        let mut resolver = StaticResolver::new();
        resolver.add_bytes("/robots.txt", "robots.txt", b"User-agent: *".to_vec());
        resolver.add_attachment("/download/report.pdf", &path).unwrap();

        let asset = resolver.resolve("/robots.txt").unwrap();
        assert!(asset.mtime.is_none());
        assert_eq!(asset.media_type, "text/plain");

        let asset = resolver.resolve("/download/report.pdf").unwrap();
        assert!(asset.attachment);
        assert_eq!(asset.media_type, "application/pdf");
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_static_decoded_uri() {
        let mut resolver = StaticResolver::new();
        resolver.add_bytes("/my file.txt", "my file.txt", b"x".to_vec());
        assert!(resolver.resolve("/my%20file.txt").is_some());
    }
}
