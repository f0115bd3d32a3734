//! License issuance settings.

use serde::{Deserialize, Serialize};

/// Settings applied when an approved application is turned into a license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensingConfig {
    /// Prefix of generated license numbers (`LIC` -> `LIC-2024-12345`).
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,

    /// Validity period of a newly issued license, in days.
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,

    /// License types accepted on intake.
    #[serde(default = "default_license_types")]
    pub license_types: Vec<String>,
}

impl Default for LicensingConfig {
    fn default() -> Self {
        Self {
            number_prefix: default_number_prefix(),
            validity_days: default_validity_days(),
            license_types: default_license_types(),
        }
    }
}

impl LicensingConfig {
    /// Check whether a submitted license type is one we issue.
    pub fn is_known_type(&self, license_type: &str) -> bool {
        self.license_types.iter().any(|t| t == license_type)
    }
}

fn default_number_prefix() -> String {
    "LIC".to_string()
}

fn default_validity_days() -> u32 {
    365
}

fn default_license_types() -> Vec<String> {
    [
        "retail",
        "wholesale",
        "food_service",
        "manufacturing",
        "professional_services",
        "transport",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
