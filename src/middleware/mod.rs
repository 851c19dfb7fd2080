//! Per-request orchestration.
//!
//! ```text
//! request ─► resolve ─► allow-list ─► validate ──fresh──► 304
//!               │                        │
//!               │                      stale
//!               ▼                        ▼
//!          pass-through              transform ─► 200
//! ```
//!
//! Validation only runs when caching is enabled and the asset has a known
//! modification time. A fresh request never reads the asset content.

mod filter;
mod request;


pub use filter::MediaTypeFilter;
pub use request::{Request, SimpleRequest};

use crate::cache;
use crate::config::AssetsConfig;
use crate::debug;
use crate::error::AssetError;
use crate::resolve::{AssetResolver, DirectoryResolver, ResolverChain, StaticResolver};
use crate::response::{AssetResponse, HttpResponse};
use crate::store::{AssetStore, Lookup, SharedStore};
use crate::transform;
use anyhow::{Context, Result};
use std::path::Path;

/// Static asset middleware.
///
/// `Send + Sync`; share it across request workers behind an `Arc`.
pub struct Middleware {
    resolver: Box<dyn AssetResolver>,
    store: Option<SharedStore>,
    filter: MediaTypeFilter,
    cache: bool,
    minify: bool,
}

impl Middleware {
    /// Middleware over `resolver` with caching on and minification off.
    pub fn new(resolver: impl AssetResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            store: None,
            filter: MediaTypeFilter::allow_all(),
            cache: true,
            minify: false,
        }
    }

    /// Serve the directories of `store` under `uri_prefix`.
    pub fn for_store(store: SharedStore, uri_prefix: &str) -> Self {
        let resolver = DirectoryResolver::new(store.clone(), uri_prefix, Lookup::Keyed);
        let mut middleware = Self::new(resolver);
        middleware.store = Some(store);
        middleware
    }

    /// Build store, resolvers and allow-list from configuration.
    ///
    /// Explicit `[[files]]` entries take precedence over directories.
    pub fn from_config(config: &AssetsConfig) -> Result<Self> {
        config.validate()?;

        let mut store = AssetStore::new();
        for dir in &config.directories {
            let path = config.root_join(&dir.path);
            store
                .register(&path, dir.key.as_deref())
                .with_context(|| format!("failed to register `{}`", path.display()))?;
        }

        let mut statics = StaticResolver::new();
        for file in &config.files {
            let path = config.root_join(&file.path);
            let added = if file.attachment {
                statics.add_attachment(&file.uri, &path)
            } else {
                statics.add_file(&file.uri, &path)
            };
            added.with_context(|| format!("failed to register `{}`", file.uri))?;
        }

        let store = store.into_shared();
        let mut chain = ResolverChain::new();
        if !statics.is_empty() {
            chain.push(statics);
        }
        chain.push(DirectoryResolver::new(
            store.clone(),
            &config.uri_prefix,
            config.lookup,
        ));

        let filter = MediaTypeFilter::new(&config.allowed_media_types)
            .context("invalid allowed_media_types")?;

        Ok(Self {
            resolver: Box::new(chain),
            store: Some(store),
            filter,
            cache: config.cache,
            minify: config.minify,
        })
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_filter(mut self, filter: MediaTypeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Store backing the directory resolver, for registering directories
    /// while serving.
    pub fn store(&self) -> Option<&SharedStore> {
        self.store.as_ref()
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache
    }

    pub fn minify_enabled(&self) -> bool {
        self.minify
    }

    /// Public URI of a file served by this middleware.
    pub fn uri_for(&self, path: impl AsRef<Path>) -> Option<String> {
        self.resolver.uri_for(path.as_ref())
    }

    /// Process one request.
    ///
    /// `Ok(PassThrough)` when the request is not for an asset. Errors are only
    /// returned for requests that did match an asset.
    pub fn process(&self, request: &impl Request) -> Result<AssetResponse, AssetError> {
        let Some(asset) = self.resolver.resolve(request.path()) else {
            return Ok(AssetResponse::PassThrough);
        };
        self.filter.check(&asset)?;

        let decision = match asset.mtime {
            Some(mtime) if self.cache => Some(cache::evaluate(mtime, request)),
            _ => None,
        };
        if let Some(decision) = decision.as_ref().filter(|d| d.fresh) {
            debug!("cache"; "not modified: {}", request.path());
            return Ok(AssetResponse::not_modified(asset, decision));
        }

        let body = transform::transform(&asset, self.minify)?;
        Ok(AssetResponse::full(asset, body, decision.as_ref()))
    }

    /// Process one request, delegating to `next` on pass-through.
    pub fn handle<R, F>(&self, request: &R, next: F) -> Result<HttpResponse, AssetError>
    where
        R: Request,
        F: FnOnce(&R) -> HttpResponse,
    {
        match self.process(request)?.into_http() {
            Some(response) => Ok(response),
            None => Ok(next(request)),
        }
    }
}
