//! Shared helpers: media types, HTTP dates, hashing, URL segments.

pub mod date;
pub mod hash;
pub mod mime;
pub mod url;
