//! License number generation and integrity hashing.
//!
//! License numbers look like `LIC-2024-12345`: configured prefix, issue
//! year, five random digits. Uniqueness is ultimately enforced by the
//! database; the store regenerates on collision.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a candidate license number for the given issue time.
pub fn generate_license_number(prefix: &str, issued_at: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let serial: u32 = rng.random_range(0..100_000);
    format!("{}-{}-{:05}", prefix, issued_at.year(), serial)
}

/// Compute the tamper-evidence hash recorded on an issued license.
///
/// SHA-256 over the stable identity fields, base64-encoded. The hash is
/// displayed by verification but carries no provenance beyond its value.
pub fn integrity_hash(
    license_number: &str,
    license_type: &str,
    business_name: &str,
    owner: Uuid,
    issue_date: DateTime<Utc>,
    expiry_date: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(license_number.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(license_type.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(business_name.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(owner.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(issue_date.to_rfc3339().as_bytes());
    hasher.update(b"\x1f");
    hasher.update(expiry_date.to_rfc3339().as_bytes());
    STANDARD_NO_PAD.encode(hasher.finalize())
}
