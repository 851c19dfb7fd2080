//! Hashing utilities.
//!
//! - `fingerprint`: fast, deterministic FxHash fingerprint (directory keys)
//! - `sha1_hex`: SHA-1 hex digest (ETags)
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let key = hash::fingerprint("/srv/assets"); // -> "9a3f0c1e2b4d5a6f"
//! let etag = hash::sha1_hex("1700000000");
//! ```

use rustc_hash::FxHasher;
use sha1::{Digest, Sha1};
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Compute hash and return as a 16-char hex fingerprint.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    format!("{:016x}", compute(value))
}

/// SHA-1 digest as lowercase hex (40 chars).
pub fn sha1_hex<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    hex::encode(Sha1::digest(value.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = fingerprint("/srv/assets");
        let b = fingerprint("/srv/assets");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_ne!(a, fingerprint("/srv/other"));
    }

    #[test]
    fn test_sha1_hex() {
        assert_eq!(sha1_hex(""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(sha1_hex("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }
}
