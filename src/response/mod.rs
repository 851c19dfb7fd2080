//! Asset responses and their HTTP rendering.

mod body;

pub use body::Body;

use crate::cache::CacheDecision;
use crate::resolve::ResolvedAsset;
use crate::utils::mime;

/// HTTP status codes emitted by the middleware.
pub mod status {
    pub const OK: u16 = 200;
    pub const NOT_MODIFIED: u16 = 304;
}

/// Result of processing one request.
#[derive(Debug)]
pub enum AssetResponse {
    /// 200 with the (possibly transformed) body.
    Full {
        asset: ResolvedAsset,
        body: Body,
        headers: Vec<(String, String)>,
    },
    /// 304, the client's copy is current.
    NotModified {
        asset: ResolvedAsset,
        headers: Vec<(String, String)>,
    },
    /// Not an asset request; the next handler takes over.
    PassThrough,
}

impl AssetResponse {
    /// Build a `Full` response.
    ///
    /// `Content-Length` is taken from the body, which already reflects any
    /// transformation.
    pub fn full(asset: ResolvedAsset, body: Body, cache: Option<&CacheDecision>) -> Self {
        let mut headers = vec![
            ("Content-Type".to_string(), content_type(&asset)),
            ("Content-Length".to_string(), body.len().to_string()),
            (
                "Content-Disposition".to_string(),
                content_disposition(&asset),
            ),
        ];
        if let Some(decision) = cache {
            headers.extend(decision.headers());
        }
        Self::Full {
            asset,
            body,
            headers,
        }
    }

    /// Build a `NotModified` response carrying the same cache headers a full
    /// response would.
    pub fn not_modified(asset: ResolvedAsset, cache: &CacheDecision) -> Self {
        let mut headers = vec![("Content-Type".to_string(), content_type(&asset))];
        headers.extend(cache.headers());
        Self::NotModified { asset, headers }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }

    /// Status code, `None` for pass-through.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Full { .. } => Some(status::OK),
            Self::NotModified { .. } => Some(status::NOT_MODIFIED),
            Self::PassThrough => None,
        }
    }

    pub fn asset(&self) -> Option<&ResolvedAsset> {
        match self {
            Self::Full { asset, .. } | Self::NotModified { asset, .. } => Some(asset),
            Self::PassThrough => None,
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        match self {
            Self::Full { headers, .. } | Self::NotModified { headers, .. } => headers,
            Self::PassThrough => &[],
        }
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(self.headers(), name)
    }

    /// Convert into the outbound response, `None` for pass-through.
    pub fn into_http(self) -> Option<HttpResponse> {
        match self {
            Self::Full { body, headers, .. } => Some(HttpResponse {
                status: status::OK,
                headers,
                body: Some(body),
            }),
            Self::NotModified { headers, .. } => Some(HttpResponse {
                status: status::NOT_MODIFIED,
                headers,
                body: None,
            }),
            Self::PassThrough => None,
        }
    }
}

/// Outbound HTTP response handed to the host.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// `None` for bodiless responses such as 304.
    pub body: Option<Body>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn content_type(asset: &ResolvedAsset) -> String {
    mime::content_type(&asset.media_type).into_owned()
}

/// `inline`, or `attachment; filename="..."` for downloads.
fn content_disposition(asset: &ResolvedAsset) -> String {
    if !asset.attachment {
        return "inline".to_string();
    }
    let filename: String = asset
        .name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("attachment; filename=\"{filename}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn asset() -> ResolvedAsset {
        ResolvedAsset::from_bytes("app.css", b"a{}".to_vec())
    }

    #[test]
    fn test_full_headers() {
        let response = AssetResponse::full(asset(), Body::Bytes(b"a{}".to_vec()), None);

        assert_eq!(response.status(), Some(200));
        assert_eq!(
            response.header("content-type"),
            Some("text/css; charset=utf-8")
        );
        assert_eq!(response.asset().unwrap().media_type, "text/css");
        assert_eq!(response.header("Content-Length"), Some("3"));
        assert_eq!(response.header("Content-Disposition"), Some("inline"));
        assert_eq!(response.header("ETag"), None);
    }

    #[test]
    fn test_full_with_cache_headers() {
        let decision = CacheDecision::for_mtime(UNIX_EPOCH + Duration::from_secs(60));
        let response =
            AssetResponse::full(asset(), Body::Bytes(b"a{}".to_vec()), Some(&decision));

        assert_eq!(response.header("Cache-Control"), Some("public, max-age=3600"));
        assert_eq!(
            response.header("Last-Modified"),
            Some("Thu, 01 Jan 1970 00:01:00 GMT")
        );
        assert!(response.header("ETag").is_some());
    }

    #[test]
    fn test_not_modified_has_no_body_or_length() {
        let decision = CacheDecision::for_mtime(UNIX_EPOCH + Duration::from_secs(60));
        let response = AssetResponse::not_modified(asset(), &decision);
        assert_eq!(response.status(), Some(304));

        let http = response.into_http().unwrap();
        assert_eq!(http.status, 304);
        assert!(http.body.is_none());
        assert!(http.header("Content-Length").is_none());
        assert_eq!(http.header("ETag"), Some(format!("\"{}\"", decision.etag).as_str()));
    }

    #[test]
    fn test_binary_content_type_has_no_charset() {
        let asset = ResolvedAsset::from_bytes("logo.svg", b"<svg/>".to_vec());
        let response = AssetResponse::full(asset, Body::Bytes(b"<svg/>".to_vec()), None);
        assert_eq!(response.header("Content-Type"), Some("image/svg+xml"));
    }

    #[test]
    fn test_attachment_disposition() {
        let asset = ResolvedAsset::from_bytes("my \"report\".pdf", b"%PDF".to_vec())
            .with_attachment(true);
        let response = AssetResponse::full(asset, Body::Bytes(b"%PDF".to_vec()), None);

        assert_eq!(
            response.header("Content-Disposition"),
            Some("attachment; filename=\"my _report_.pdf\"")
        );
    }

    #[test]
    fn test_pass_through() {
        let response = AssetResponse::PassThrough;
        assert!(response.is_pass_through());
        assert!(response.headers().is_empty());
        assert!(response.into_http().is_none());
    }
}
