use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// Configuration types shared across all Permit crates
pub mod config;

// License number generation and integrity hashing
pub mod numbering;

// Public verification (pure time/status math)
pub mod verify;

pub use config::{
    ConfigError, DatabaseConfig, LicensingConfig, PermitConfig, ServerConfig, SessionEntry,
    SessionsConfig,
};
pub use verify::{VerificationOutcome, VerifiedLicense, verify};

/// Application-level role, as stored in `user_roles.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Admin,
    User,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Admin => "admin",
            AppRole::User => "user",
        }
    }

    /// Parse a role as stored in the database.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(AppRole::Admin),
            "user" => Some(AppRole::User),
            _ => None,
        }
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The requesting identity, resolved once per request and passed explicitly
/// to every policy check and store operation.
///
/// An anonymous principal has no user id and no roles; it exists so the
/// public verification path goes through the same authorization engine as
/// every other access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Option<Uuid>,
    pub roles: Vec<AppRole>,
}

impl Principal {
    /// The unauthenticated principal used by the public verification path.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            roles: Vec::new(),
        }
    }

    pub fn authenticated(user_id: Uuid, roles: Vec<AppRole>) -> Self {
        Self {
            user_id: Some(user_id),
            roles,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&AppRole::Admin)
    }
}

/// Status of a license application through the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    InReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::InReview => "in_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApplicationStatus::Pending),
            "in_review" => Some(ApplicationStatus::InReview),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    /// Whether an application in this status can still receive a review
    /// decision. Approved and rejected applications are final.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Pending | ApplicationStatus::InReview
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored status of an issued license.
///
/// Note that verification recomputes the surfaced status: an `Active`
/// license past its expiry date is displayed as `Expired` even when the
/// stored column still says `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Expired,
    Suspended,
    Revoked,
}

impl LicenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseStatus::Active => "active",
            LicenseStatus::Expired => "expired",
            LicenseStatus::Suspended => "suspended",
            LicenseStatus::Revoked => "revoked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(LicenseStatus::Active),
            "expired" => Some(LicenseStatus::Expired),
            "suspended" => Some(LicenseStatus::Suspended),
            "revoked" => Some(LicenseStatus::Revoked),
            _ => None,
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user profile row, provisioned automatically the first time an
/// authenticated identity is seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Intake payload for a new license application.
///
/// Deliberately has no status field: stored applications are always
/// `pending` on insert, whatever the client sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
    pub license_type: String,
    pub business_name: String,
    pub registration_number: String,
    pub business_address: String,
    pub contact_person: String,
    pub contact_email: String,
    pub phone_number: String,
    pub business_type: String,
    pub business_description: String,
}

/// A stored license application row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseApplication {
    pub id: Uuid,
    pub owner: Uuid,
    pub license_type: String,
    pub business_name: String,
    pub registration_number: String,
    pub business_address: String,
    pub contact_person: String,
    pub contact_email: String,
    pub phone_number: String,
    pub business_type: String,
    pub business_description: String,
    pub status: ApplicationStatus,
    pub review_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An administrator's review decision for an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    InReview,
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn as_status(&self) -> ApplicationStatus {
        match self {
            ReviewDecision::InReview => ApplicationStatus::InReview,
            ReviewDecision::Approved => ApplicationStatus::Approved,
            ReviewDecision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// A full license row, as visible to its owner or an administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: Uuid,
    pub license_number: String,
    pub license_type: String,
    pub business_name: String,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub status: LicenseStatus,
    pub integrity_hash: Option<String>,
    pub owner: Uuid,
    pub application_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The redacted license view observable through the anonymous verification
/// path. Exactly the columns the policy engine grants to the anonymous
/// principal; internal id, owner, and application linkage never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicLicense {
    pub license_number: String,
    pub license_type: String,
    pub business_name: String,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub status: LicenseStatus,
    pub integrity_hash: Option<String>,
}

impl PublicLicense {
    /// Validity as computed at verification time: stored status must be
    /// `active` and the expiry date must still be in the future.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.status == LicenseStatus::Active && now < self.expiry_date
    }

    /// The status surfaced to the public: `Expired` overrides a stored
    /// `active` once the expiry date has passed.
    pub fn display_status(&self, now: DateTime<Utc>) -> LicenseStatus {
        if self.status == LicenseStatus::Active && now >= self.expiry_date {
            LicenseStatus::Expired
        } else {
            self.status
        }
    }
}

impl From<License> for PublicLicense {
    fn from(l: License) -> Self {
        Self {
            license_number: l.license_number,
            license_type: l.license_type,
            business_name: l.business_name,
            issue_date: l.issue_date,
            expiry_date: l.expiry_date,
            status: l.status,
            integrity_hash: l.integrity_hash,
        }
    }
}
