//! Key fingerprint for start-up logs.
//!
//! Operators compare fingerprints to tell which secret a deployment runs
//! with; the key itself never reaches the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First eight bytes of SHA-256 over the key's signing half, hex encoded.
///
/// ```
/// use actix_web::cookie::Key;
/// use authgate::inbound::http::session_config::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::derive_from(&[7; 64]));
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
