//! Conditional-request validation.
//!
//! Validators are derived from the asset's modification time only:
//!
//! - `ETag`: quoted hex SHA-1 of the mtime in whole unix seconds
//! - `Last-Modified`: the mtime truncated to seconds, as IMF-fixdate
//!
//! A request is fresh when `If-None-Match` lists the current ETag or
//! `If-Modified-Since` is not earlier than `Last-Modified`.

use crate::middleware::Request;
use crate::utils::date::{self, HttpDate};
use crate::utils::hash;
use std::time::SystemTime;

/// `Cache-Control` value sent with every validated response.
pub const CACHE_CONTROL: &str = "public, max-age=3600";

/// Outcome of validating one request against an asset's mtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDecision {
    /// Unquoted entity tag.
    pub etag: String,
    /// Modification time truncated to whole seconds.
    pub last_modified: SystemTime,
    /// The client's cached copy is current.
    pub fresh: bool,
}

impl CacheDecision {
    /// Validators for an asset, without consulting any request headers.
    pub fn for_mtime(mtime: SystemTime) -> Self {
        Self {
            etag: etag_for(mtime),
            last_modified: date::truncate_to_seconds(mtime),
            fresh: false,
        }
    }

    /// `Cache-Control`, `ETag` and `Last-Modified` headers.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Cache-Control".to_string(), CACHE_CONTROL.to_string()),
            ("ETag".to_string(), format!("\"{}\"", self.etag)),
            (
                "Last-Modified".to_string(),
                HttpDate::from_system_time(self.last_modified).to_string(),
            ),
        ]
    }
}

/// Entity tag for a modification time.
pub fn etag_for(mtime: SystemTime) -> String {
    hash::sha1_hex(&date::unix_seconds(mtime).to_string())
}

/// Validate `request` against an asset modified at `mtime`.
pub fn evaluate(mtime: SystemTime, request: &impl Request) -> CacheDecision {
    let mut decision = CacheDecision::for_mtime(mtime);

    let etag_match = request
        .header("If-None-Match")
        .is_some_and(|header| matches_etag(header, &decision.etag));
    let not_modified = request
        .header("If-Modified-Since")
        .is_some_and(|header| not_modified_since(header, decision.last_modified));

    decision.fresh = etag_match || not_modified;
    decision
}

/// `If-None-Match` list membership. Weak tags compare equal to strong ones.
fn matches_etag(header: &str, etag: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        if candidate == "*" {
            return true;
        }
        let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
        candidate.trim_matches('"') == etag
    })
}

/// `If-Modified-Since` at or after `last_modified`. Unparseable dates never match.
fn not_modified_since(header: &str, last_modified: SystemTime) -> bool {
    HttpDate::parse(header)
        .is_some_and(|since| since >= HttpDate::from_system_time(last_modified))
}
