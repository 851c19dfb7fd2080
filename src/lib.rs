//! Assetware - static asset middleware.
//!
//! Serves files from registered asset directories under a URI prefix, with
//! optional minification and conditional-request handling.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── store/       # AssetStore: keyed, traversal-safe directory roots
//! ├── resolve/     # AssetResolver: request path -> ResolvedAsset
//! ├── transform/   # CSS/JS minification, SVG sanitization
//! ├── cache/       # ETag / Last-Modified validation
//! ├── response/    # AssetResponse, HttpResponse, Body
//! ├── middleware/  # Middleware: per-request orchestration
//! ├── config/      # AssetsConfig (TOML)
//! ├── serve/       # tiny_http host
//! ├── error.rs     # AssetError
//! ├── logger.rs    # log!/debug! macros
//! └── utils/       # mime, date, hash, url helpers
//! ```
//!
//! # Example
//!
//! ```ignore
//! let config = AssetsConfig::from_path("assets.toml")?;
//! let middleware = Middleware::from_config(&config)?;
//!
//! let request = SimpleRequest::new("/assets/v2/app.css");
//! let response = middleware.handle(&request, |_| HttpResponse::new(404))?;
//! ```

pub mod logger;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod resolve;
pub mod response;
pub mod serve;
pub mod store;
pub mod transform;
pub mod utils;

pub use config::{AssetsConfig, ConfigError};
pub use error::AssetError;
pub use middleware::{MediaTypeFilter, Middleware, Request, SimpleRequest};
pub use resolve::{AssetResolver, DirectoryResolver, ResolvedAsset, ResolverChain, StaticResolver};
pub use response::{AssetResponse, Body, HttpResponse};
pub use store::{AssetStore, Lookup, SharedStore};
