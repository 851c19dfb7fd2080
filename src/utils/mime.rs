//! Media type detection by file extension.
//!
//! Media types are bare (no `charset` parameter): the transformer dispatches
//! on an exact match and the allow-list globs against them. The charset is
//! added only when the `Content-Type` header is built, see [`content_type`].

use std::borrow::Cow;
use std::path::Path;

/// Media types the crate refers to by name.
pub mod types {
    pub const PLAIN: &str = "text/plain";
    pub const CSS: &str = "text/css";
    pub const JAVASCRIPT: &str = "text/javascript";
    pub const APPLICATION_JAVASCRIPT: &str = "application/javascript";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Lowercase extension -> media type.
const BY_EXTENSION: &[(&str, &str)] = &[
    // text
    ("css", types::CSS),
    ("csv", "text/csv"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("md", "text/markdown"),
    ("txt", types::PLAIN),
    // scripts and data
    ("cjs", types::JAVASCRIPT),
    ("js", types::JAVASCRIPT),
    ("mjs", types::JAVASCRIPT),
    ("json", "application/json"),
    ("map", "application/json"),
    ("webmanifest", "application/manifest+json"),
    ("xml", "application/xml"),
    ("rss", "application/rss+xml"),
    ("atom", "application/atom+xml"),
    ("wasm", "application/wasm"),
    // images
    ("avif", "image/avif"),
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("ico", types::ICO),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("svg", types::SVG),
    ("webp", "image/webp"),
    // fonts
    ("eot", "application/vnd.ms-fontobject"),
    ("otf", "font/otf"),
    ("ttf", "font/ttf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    // media
    ("flac", "audio/flac"),
    ("mp3", "audio/mpeg"),
    ("oga", "audio/ogg"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/wav"),
    ("m4v", "video/mp4"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    // archives and documents
    ("gz", "application/gzip"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
];

/// Media type of a file, from its extension (case-insensitive).
pub fn from_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(types::OCTET_STREAM, |ext| {
            from_extension(&ext.to_ascii_lowercase())
        })
}

/// Media type for a lowercase extension, `application/octet-stream` if unknown.
pub fn from_extension(ext: &str) -> &'static str {
    BY_EXTENSION
        .iter()
        .find(|(e, _)| *e == ext)
        .map_or(types::OCTET_STREAM, |&(_, media_type)| media_type)
}

/// `Content-Type` header value: `text/*` types get `; charset=utf-8`.
///
/// Values that already carry parameters are left alone.
pub fn content_type(media_type: &str) -> Cow<'_, str> {
    let is_text = media_type
        .get(..5)
        .is_some_and(|top| top.eq_ignore_ascii_case("text/"));
    if is_text && !media_type.contains(';') {
        Cow::Owned(format!("{media_type}; charset=utf-8"))
    } else {
        Cow::Borrowed(media_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path(Path::new("style.css")), "text/css");
        assert_eq!(from_path(Path::new("app.js")), "text/javascript");
        assert_eq!(from_path(Path::new("logo.png")), "image/png");
        assert_eq!(from_path(Path::new("image.svg")), "image/svg+xml");
        assert_eq!(from_path(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(from_path(Path::new("lipsum.txt")), "text/plain");
        assert_eq!(from_path(Path::new("unknown.xyz")), types::OCTET_STREAM);
        assert_eq!(from_path(Path::new("Makefile")), types::OCTET_STREAM);
    }

    #[test]
    fn test_extension_case() {
        assert_eq!(from_path(Path::new("PHOTO.JPG")), "image/jpeg");
        assert_eq!(from_path(Path::new("Style.CSS")), "text/css");
        assert_eq!(from_extension("CSS"), types::OCTET_STREAM);
    }

    #[test]
    fn test_content_type_charset() {
        assert_eq!(content_type("text/css"), "text/css; charset=utf-8");
        assert_eq!(content_type("text/plain"), "text/plain; charset=utf-8");
        assert_eq!(content_type("image/svg+xml"), "image/svg+xml");
        assert_eq!(content_type("application/javascript"), "application/javascript");
        assert_eq!(
            content_type("text/html; charset=iso-8859-1"),
            "text/html; charset=iso-8859-1"
        );
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for (ext, _) in BY_EXTENSION {
            assert!(seen.insert(ext), "duplicate extension {ext}");
        }
    }
}
