//! Public license verification.
//!
//! Verification is a pure function of the queried number, the stored row
//! (if any) and the current time. The lookup itself happens elsewhere under
//! the anonymous principal; this module only does the status/validity math
//! and shapes the uniform response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LicenseStatus, PublicLicense};

/// Result of verifying a license number.
///
/// The no-match arm carries nothing but the queried number: a malformed
/// number and a missing number produce byte-identical responses, so an
/// unauthenticated caller cannot learn anything from error-message shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerificationOutcome {
    Verified(VerifiedLicense),
    NotVerified { license_number: String },
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        match self {
            VerificationOutcome::Verified(v) => v.valid,
            VerificationOutcome::NotVerified { .. } => false,
        }
    }

    pub fn license_number(&self) -> &str {
        match self {
            VerificationOutcome::Verified(v) => &v.license_number,
            VerificationOutcome::NotVerified { license_number } => license_number,
        }
    }
}

/// The public details returned for a matched license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedLicense {
    pub valid: bool,
    pub license_number: String,
    pub license_type: String,
    pub business_name: String,
    /// Display status: `Expired` overrides a stored `active` past expiry.
    pub status: LicenseStatus,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub integrity_hash: Option<String>,
}

/// Verify a queried number against the (already redacted) stored row.
///
/// Deterministic given the row and `now`; performs no I/O.
pub fn verify(
    number: &str,
    row: Option<PublicLicense>,
    now: DateTime<Utc>,
) -> VerificationOutcome {
    let Some(license) = row else {
        return VerificationOutcome::NotVerified {
            license_number: number.to_string(),
        };
    };

    VerificationOutcome::Verified(VerifiedLicense {
        valid: license.is_valid_at(now),
        status: license.display_status(now),
        license_number: license.license_number,
        license_type: license.license_type,
        business_name: license.business_name,
        issue_date: license.issue_date,
        expiry_date: license.expiry_date,
        integrity_hash: license.integrity_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(status: LicenseStatus, expiry: DateTime<Utc>) -> PublicLicense {
        PublicLicense {
            license_number: "LIC-2024-00042".to_string(),
            license_type: "food_service".to_string(),
            business_name: "Harbor Deli".to_string(),
            issue_date: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            expiry_date: expiry,
            status,
            integrity_hash: Some("c2lnbmF0dXJl".to_string()),
        }
    }

    #[test]
    fn unknown_number_echoes_query_only() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let outcome = verify("LIC-2024-12345", None, now);

        assert!(!outcome.is_valid());
        assert_eq!(outcome.license_number(), "LIC-2024-12345");
        match outcome {
            VerificationOutcome::NotVerified { license_number } => {
                assert_eq!(license_number, "LIC-2024-12345");
            }
            VerificationOutcome::Verified(_) => panic!("unexpected match"),
        }
    }

    #[test]
    fn garbage_input_gets_the_same_shape_as_a_miss() {
        let now = Utc::now();
        let a = verify("not a license number!!", None, now);
        let b = verify("LIC-1999-00001", None, now);

        assert!(matches!(a, VerificationOutcome::NotVerified { .. }));
        assert!(matches!(b, VerificationOutcome::NotVerified { .. }));
    }

    #[test]
    fn active_future_expiry_verifies() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let outcome = verify("LIC-2024-00042", Some(row(LicenseStatus::Active, expiry)), now);

        let VerificationOutcome::Verified(v) = outcome else {
            panic!("expected a match");
        };
        assert!(v.valid);
        assert_eq!(v.status, LicenseStatus::Active);
        assert_eq!(v.business_name, "Harbor Deli");
    }

    #[test]
    fn active_past_expiry_surfaces_expired_not_invalid_lookup() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let outcome = verify("LIC-2024-00042", Some(row(LicenseStatus::Active, expiry)), now);

        let VerificationOutcome::Verified(v) = outcome else {
            panic!("expected a match");
        };
        assert!(!v.valid);
        assert_eq!(v.status, LicenseStatus::Expired);
    }

    #[test]
    fn suspended_and_revoked_never_verify() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        for status in [LicenseStatus::Suspended, LicenseStatus::Revoked] {
            let outcome = verify("LIC-2024-00042", Some(row(status, expiry)), now);
            let VerificationOutcome::Verified(v) = outcome else {
                panic!("expected a match");
            };
            assert!(!v.valid, "{status} must not verify");
            assert_eq!(v.status, status);
        }
    }
}
