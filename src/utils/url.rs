//! URL path helpers: percent-encoding at the request boundary.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::path::{Component, Path};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Strip query string and fragment.
pub fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Percent-decode a single segment. Invalid UTF-8 yields `None`.
pub fn decode_segment(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(std::borrow::Cow::into_owned)
}

/// Percent-encode a single segment (escapes `/`).
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Percent-decode each `/`-separated segment of a relative path.
///
/// Returns `None` if a decoded segment introduces a separator, which would
/// change how the path is split.
pub fn decode_relative(path: &str) -> Option<String> {
    let mut decoded = Vec::new();
    for segment in path.split('/') {
        let segment = decode_segment(segment)?;
        if segment.contains(['/', '\\']) {
            return None;
        }
        decoded.push(segment);
    }
    Some(decoded.join("/"))
}

/// Encode a relative filesystem path as `/`-joined, percent-encoded segments.
///
/// Returns `None` for non-UTF-8 or non-normal components.
pub fn encode_relative(path: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => segments.push(encode_segment(part.to_str()?)),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(segments.join("/"))
}

/// Whether a string contains a path separator (either flavor).
#[inline]
pub fn has_separator(s: &str) -> bool {
    s.contains(['/', '\\'])
}
