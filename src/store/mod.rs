//! Registry of local asset directories.
//!
//! The store maps directory keys to canonical roots and is the only place
//! where request-relative paths become filesystem paths. Every lookup goes
//! through `canonicalize` and a prefix check against the root, so `..`
//! segments and symlinks cannot escape a registered directory. Resolution
//! failures of any kind are reported as `None` (fail closed).
//!
//! Roots are registered at configuration time. When registration must
//! happen while requests are being served, share the store as a
//! [`SharedStore`].

mod root;

pub use root::{AssetRoot, Lookup, RootKey};

use crate::debug;
use crate::error::AssetError;
use crate::utils::{hash, url};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Store shared between the configuration side and request workers.
pub type SharedStore = Arc<RwLock<AssetStore>>;

/// Registered asset roots, in registration order.
#[derive(Debug, Default)]
pub struct AssetStore {
    roots: Vec<AssetRoot>,
    by_key: FxHashMap<String, usize>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a [`SharedStore`].
    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Register a directory.
    ///
    /// Without an explicit key, the key is a fingerprint of the canonical
    /// path, so the same directory always gets the same key.
    pub fn register(
        &mut self,
        path: impl AsRef<Path>,
        key: Option<&str>,
    ) -> Result<RootKey, AssetError> {
        let path = path.as_ref();
        let canonical = validate_directory(path)?;

        let key = match key {
            Some("") => return Err(AssetError::EmptyKey),
            Some(key) if url::has_separator(key) => {
                return Err(AssetError::InvalidKey {
                    key: key.to_string(),
                });
            }
            Some(key) => key.to_string(),
            None => hash::fingerprint(canonical.as_os_str().as_encoded_bytes()),
        };

        if self.by_key.contains_key(&key) {
            return Err(AssetError::DuplicateKey { key });
        }

        debug!("store"; "registered `{}` -> {}", key, canonical.display());

        let root_key = RootKey::new(key.clone());
        self.by_key.insert(key, self.roots.len());
        self.roots.push(AssetRoot::new(root_key.clone(), canonical));
        Ok(root_key)
    }

    /// Resolve `relative` under the root registered as `key`.
    pub fn resolve(&self, key: &str, relative: &str) -> Option<PathBuf> {
        self.get(key)?.resolve(relative)
    }

    /// Resolve `relative` against every root in registration order.
    pub fn resolve_any(&self, relative: &str) -> Option<(&AssetRoot, PathBuf)> {
        self.roots
            .iter()
            .find_map(|root| root.resolve(relative).map(|path| (root, path)))
    }

    /// Find the root containing `absolute` and the path relative to it.
    ///
    /// `absolute` is canonicalized first; the first registered root that is a
    /// prefix wins when roots are nested.
    pub fn locate(&self, absolute: &Path) -> Option<(&AssetRoot, PathBuf)> {
        let canonical = absolute.canonicalize().ok()?;
        self.roots.iter().find_map(|root| {
            let rest = canonical.strip_prefix(root.path()).ok()?;
            (!rest.as_os_str().is_empty()).then(|| (root, rest.to_path_buf()))
        })
    }

    /// Public URI of a file under a registered root: `prefix + key + "/" + rest`.
    ///
    /// The key and every segment of `rest` are percent-encoded.
    pub fn uri_for(&self, prefix: &str, absolute: &Path) -> Option<String> {
        let (root, rest) = self.locate(absolute)?;
        let rest = url::encode_relative(&rest)?;
        Some(format!(
            "{prefix}{}/{rest}",
            url::encode_segment(root.key().as_str())
        ))
    }

    pub fn get(&self, key: &str) -> Option<&AssetRoot> {
        self.by_key.get(key).map(|&i| &self.roots[i])
    }

    pub fn roots(&self) -> &[AssetRoot] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Canonicalize `path` and check it is a readable directory.
fn validate_directory(path: &Path) -> Result<PathBuf, AssetError> {
    let invalid = || AssetError::InvalidDirectory {
        path: path.to_path_buf(),
    };

    let canonical = path.canonicalize().map_err(|_| invalid())?;
    if !canonical.is_dir() || fs::read_dir(&canonical).is_err() {
        return Err(invalid());
    }
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("assets");
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("app.css"), "body{}").unwrap();
        fs::write(root.join("css/site.css"), "a{}").unwrap();
        fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        (dir, root)
    }

    #[test]
    fn test_register_explicit_key() {
        let (_dir, root) = fixture();
        let mut store = AssetStore::new();

        let key = store.register(&root, Some("v2")).unwrap();
        assert_eq!(key.as_str(), "v2");
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("v2").unwrap().path(),
            root.canonicalize().unwrap()
        );
    }

    #[test]
    fn test_register_derived_key_is_deterministic() {
        let (_dir, root) = fixture();

        let mut a = AssetStore::new();
        let mut b = AssetStore::new();
        let key_a = a.register(&root, None).unwrap();
        let key_b = b.register(root.join("css/.."), None).unwrap();

        assert_eq!(key_a, key_b);
        assert_eq!(key_a.as_str().len(), 16);
    }

    #[test]
    fn test_register_errors() {
        let (dir, root) = fixture();
        let mut store = AssetStore::new();

        let err = store.register(dir.path().join("missing"), None).unwrap_err();
        assert!(matches!(err, AssetError::InvalidDirectory { .. }));

        let err = store.register(root.join("app.css"), None).unwrap_err();
        assert!(matches!(err, AssetError::InvalidDirectory { .. }));

        let err = store.register(&root, Some("")).unwrap_err();
        assert!(matches!(err, AssetError::EmptyKey));

        let err = store.register(&root, Some("a/b")).unwrap_err();
        assert!(matches!(err, AssetError::InvalidKey { .. }));

        store.register(&root, Some("v2")).unwrap();
        let err = store.register(dir.path(), Some("v2")).unwrap_err();
        assert!(matches!(err, AssetError::DuplicateKey { key } if key == "v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_resolve_existing_files() {
        let (_dir, root) = fixture();
        let mut store = AssetStore::new();
        store.register(&root, Some("k")).unwrap();

        let canonical = root.canonicalize().unwrap();
        assert_eq!(
            store.resolve("k", "app.css"),
            Some(canonical.join("app.css"))
        );
        assert_eq!(
            store.resolve("k", "css/site.css"),
            Some(canonical.join("css/site.css"))
        );
        // `..` that stays inside the root is fine
        assert_eq!(
            store.resolve("k", "css/../app.css"),
            Some(canonical.join("app.css"))
        );
    }

    #[test]
    fn test_resolve_misses() {
        let (_dir, root) = fixture();
        let mut store = AssetStore::new();
        store.register(&root, Some("k")).unwrap();

        assert_eq!(store.resolve("k", "missing.css"), None);
        assert_eq!(store.resolve("k", "css"), None);
        assert_eq!(store.resolve("k", ""), None);
        assert_eq!(store.resolve("other", "app.css"), None);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (dir, root) = fixture();
        let mut store = AssetStore::new();
        store.register(&root, Some("k")).unwrap();

        assert!(dir.path().join("secret.txt").exists());
        assert_eq!(store.resolve("k", "../secret.txt"), None);
        assert_eq!(store.resolve("k", "css/../../secret.txt"), None);
        assert_eq!(store.resolve("k", "../../../../etc/passwd"), None);

        let absolute = dir.path().join("secret.txt");
        assert_eq!(store.resolve("k", absolute.to_str().unwrap()), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_escape() {
        let (dir, root) = fixture();
        std::os::unix::fs::symlink(dir.path().join("secret.txt"), root.join("leak.txt"))
            .unwrap();

        let mut store = AssetStore::new();
        store.register(&root, Some("k")).unwrap();
        assert_eq!(store.resolve("k", "leak.txt"), None);
    }

    #[test]
    fn test_uri_for_roundtrip() {
        let (_dir, root) = fixture();
        let mut store = AssetStore::new();
        let key = store.register(&root, Some("v2")).unwrap();

        for relative in ["app.css", "css/site.css"] {
            let path = store.resolve(key.as_str(), relative).unwrap();
            assert_eq!(
                store.uri_for("/static/", &path),
                Some(format!("/static/v2/{relative}"))
            );
        }
    }

    #[test]
    fn test_uri_for_encodes_key_and_segments() {
        let (_dir, root) = fixture();
        fs::write(root.join("my file.txt"), "x").unwrap();
        let mut store = AssetStore::new();
        store.register(&root, Some("v 2")).unwrap();

        assert_eq!(
            store.uri_for("/a/", &root.join("my file.txt")),
            Some("/a/v%202/my%20file.txt".to_string())
        );
    }

    #[test]
    fn test_uri_for_outside_roots() {
        let (dir, root) = fixture();
        let mut store = AssetStore::new();
        store.register(&root, Some("v2")).unwrap();

        assert_eq!(store.uri_for("/a/", &dir.path().join("secret.txt")), None);
        assert_eq!(store.uri_for("/a/", &root), None);
        assert_eq!(store.uri_for("/a/", &dir.path().join("nope")), None);
    }

    #[test]
    fn test_resolve_any_in_registration_order() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(first.join("shared.css"), "first").unwrap();
        fs::write(second.join("shared.css"), "second").unwrap();
        fs::write(second.join("only.css"), "second").unwrap();

        let mut store = AssetStore::new();
        store.register(&first, Some("a")).unwrap();
        store.register(&second, Some("b")).unwrap();

        let (root, path) = store.resolve_any("shared.css").unwrap();
        assert_eq!(root.key().as_str(), "a");
        assert_eq!(fs::read_to_string(path).unwrap(), "first");

        let (root, _) = store.resolve_any("only.css").unwrap();
        assert_eq!(root.key().as_str(), "b");
        assert!(store.resolve_any("none.css").is_none());
    }
}
