//! Resolver over the registered directories of an [`AssetStore`].

use super::{AssetResolver, ResolvedAsset};
use crate::store::{AssetStore, Lookup, SharedStore};
use crate::utils::url;
use std::path::Path;

/// Map a request path to a file under one of the store's roots.
///
/// The request path must start with `uri_prefix` (ASCII case-insensitive).
/// With [`Lookup::Keyed`] the remainder is `{key}/{relative}`; with
/// [`Lookup::PrefixScan`] the whole remainder is the relative path and roots
/// are tried in order. Anything that does not match, or names a file that
/// does not exist, yields `None`.
pub fn resolve_request(
    store: &AssetStore,
    request_path: &str,
    uri_prefix: &str,
    lookup: Lookup,
) -> Option<ResolvedAsset> {
    let path = url::strip_query(request_path);
    let remainder = strip_prefix_ignore_case(path, uri_prefix)?;

    let resolved = match lookup {
        Lookup::Keyed => {
            let (key, relative) = remainder.split_once('/')?;
            if key.is_empty() || relative.is_empty() {
                return None;
            }
            let key = url::decode_segment(key)?;
            if url::has_separator(&key) {
                return None;
            }
            let relative = url::decode_relative(relative)?;
            store.resolve(&key, &relative)?
        }
        Lookup::PrefixScan => {
            let relative = url::decode_relative(remainder)?;
            store.resolve_any(&relative)?.1
        }
    };

    Some(ResolvedAsset::from_file(resolved))
}

fn strip_prefix_ignore_case<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &path[prefix.len()..])
}

/// Ensure a URI prefix starts and ends with `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Resolver serving the directories of a shared store under one URI prefix.
pub struct DirectoryResolver {
    store: SharedStore,
    uri_prefix: String,
    lookup: Lookup,
}

impl DirectoryResolver {
    pub fn new(store: SharedStore, uri_prefix: &str, lookup: Lookup) -> Self {
        Self {
            store,
            uri_prefix: normalize_prefix(uri_prefix),
            lookup,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn uri_prefix(&self) -> &str {
        &self.uri_prefix
    }

    pub fn lookup(&self) -> Lookup {
        self.lookup
    }
}

impl AssetResolver for DirectoryResolver {
    fn resolve(&self, request_path: &str) -> Option<ResolvedAsset> {
        let store = self.store.read();
        resolve_request(&store, request_path, &self.uri_prefix, self.lookup)
    }

    fn uri_for(&self, path: &Path) -> Option<String> {
        let store = self.store.read();
        match self.lookup {
            Lookup::Keyed => store.uri_for(&self.uri_prefix, path),
            Lookup::PrefixScan => {
                let (_, rest) = store.locate(path)?;
                Some(format!("{}{}", self.uri_prefix, url::encode_relative(&rest)?))
            }
        }
    }
}
