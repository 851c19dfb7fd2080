//! Request path -> asset resolution.
//!
//! A resolver either claims a request (returns a [`ResolvedAsset`]) or
//! declines it (`None`), in which case the request is not an asset request
//! and the surrounding pipeline handles it. Resolvers compose into a
//! [`ResolverChain`] where the first claim wins.
//!
//! | Resolver              | Matches                                      |
//! |-----------------------|----------------------------------------------|
//! | [`DirectoryResolver`] | `{prefix}{key}/{relative}` under store roots |
//! | [`StaticResolver`]    | explicitly registered URIs                   |
//! | `Fn(&str) -> Option`  | anything the closure claims                  |

mod asset;
mod directory;
mod statics;

pub use asset::{AssetSource, ResolvedAsset};
pub use directory::{DirectoryResolver, normalize_prefix, resolve_request};
pub use statics::StaticResolver;

use std::path::Path;

/// Maps request paths to assets, and assets back to public URIs.
pub trait AssetResolver: Send + Sync {
    /// Resolve a request path, `None` when the request is not for this resolver.
    fn resolve(&self, request_path: &str) -> Option<ResolvedAsset>;

    /// Public URI for a file served by this resolver.
    fn uri_for(&self, path: &Path) -> Option<String>;
}

impl<F> AssetResolver for F
where
    F: Fn(&str) -> Option<ResolvedAsset> + Send + Sync,
{
    fn resolve(&self, request_path: &str) -> Option<ResolvedAsset> {
        self(request_path)
    }

    fn uri_for(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Ordered list of resolvers, tried in sequence.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn AssetResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resolver: impl AssetResolver + 'static) {
        self.resolvers.push(Box::new(resolver));
    }

    pub fn with(mut self, resolver: impl AssetResolver + 'static) -> Self {
        self.push(resolver);
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl AssetResolver for ResolverChain {
    fn resolve(&self, request_path: &str) -> Option<ResolvedAsset> {
        self.resolvers.iter().find_map(|r| r.resolve(request_path))
    }

    fn uri_for(&self, path: &Path) -> Option<String> {
        self.resolvers.iter().find_map(|r| r.uri_for(path))
    }
}
