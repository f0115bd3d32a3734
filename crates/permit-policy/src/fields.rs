//! Intake field validation.
//!
//! Every constraint produces a field-labelled violation; validation runs
//! to completion and returns the full list, so the caller can surface all
//! problems at once. Nothing here touches storage — a payload that fails
//! these rules is rejected before any insert is attempted.

use permit_core::{LicensingConfig, NewApplication};
use serde::Serialize;

/// One violated field constraint.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Field rules for license application intake.
pub struct IntakeRules {
    license_types: Vec<String>,
}

impl IntakeRules {
    /// Build the rules from the licensing configuration (the accepted
    /// license types come from there).
    pub fn new(licensing: &LicensingConfig) -> Self {
        Self {
            license_types: licensing.license_types.clone(),
        }
    }

    /// Validate an intake payload, collecting every violation.
    pub fn validate(&self, app: &NewApplication) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        if !self.license_types.iter().any(|t| t == &app.license_type) {
            violations.push(FieldViolation::new(
                "license_type",
                format!(
                    "Unknown license type '{}'; expected one of: {}",
                    app.license_type,
                    self.license_types.join(", ")
                ),
            ));
        }

        check_length(&mut violations, "business_name", &app.business_name, 2, 200);
        check_length(
            &mut violations,
            "registration_number",
            &app.registration_number,
            4,
            32,
        );
        check_pattern(
            &mut violations,
            "registration_number",
            &app.registration_number,
            r"(?i)^[A-Z0-9/\-]+$",
            "may only contain letters, digits, '/' and '-'",
        );
        check_length(
            &mut violations,
            "business_address",
            &app.business_address,
            5,
            300,
        );
        check_length(&mut violations, "contact_person", &app.contact_person, 2, 120);
        check_pattern(
            &mut violations,
            "contact_email",
            &app.contact_email,
            r"^[^@\s]+@[^@\s]+\.[^@\s]+$",
            "must be a valid email address",
        );
        check_length(&mut violations, "phone_number", app.phone_number.trim(), 7, 20);
        check_pattern(
            &mut violations,
            "phone_number",
            app.phone_number.trim(),
            r"^\+?[0-9][0-9 \-]*$",
            "may only contain digits, spaces, '-' and a leading '+'",
        );
        check_length(&mut violations, "business_type", &app.business_type, 2, 64);
        check_length(
            &mut violations,
            "business_description",
            &app.business_description,
            20,
            2000,
        );

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn check_length(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min {
        violations.push(FieldViolation::new(
            field,
            format!("must be at least {min} characters"),
        ));
    } else if len > max {
        violations.push(FieldViolation::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

fn check_pattern(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: &str,
    pattern: &str,
    message: &str,
) {
    match regex::Regex::new(pattern) {
        Ok(re) => {
            if !re.is_match(value) {
                violations.push(FieldViolation::new(field, message));
            }
        }
        Err(_) => {
            tracing::warn!("Invalid validation pattern for field {}: {}", field, pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> IntakeRules {
        IntakeRules::new(&LicensingConfig::default())
    }

    fn valid_application() -> NewApplication {
        NewApplication {
            license_type: "retail".to_string(),
            business_name: "Harbor Deli".to_string(),
            registration_number: "REG-2024/0081".to_string(),
            business_address: "14 Quay Street, Dockside".to_string(),
            contact_person: "Jo Fletcher".to_string(),
            contact_email: "jo@harbordeli.example".to_string(),
            phone_number: "+44 20 7946 0123".to_string(),
            business_type: "sole_trader".to_string(),
            business_description: "A delicatessen selling fresh produce near the harbor."
                .to_string(),
        }
    }

    #[test]
    fn valid_application_passes() {
        assert!(rules().validate(&valid_application()).is_ok());
    }

    #[test]
    fn nineteen_char_description_is_rejected_with_field_label() {
        let mut app = valid_application();
        app.business_description = "nineteen chars long".to_string();
        assert_eq!(app.business_description.chars().count(), 19);

        let violations = rules().validate(&app).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "business_description");
        assert!(violations[0].message.contains("at least 20"));
    }

    #[test]
    fn twenty_char_description_is_accepted() {
        let mut app = valid_application();
        app.business_description = "exactly twenty chars".to_string();
        assert_eq!(app.business_description.chars().count(), 20);
        assert!(rules().validate(&app).is_ok());
    }

    #[test]
    fn bad_email_is_rejected() {
        let mut app = valid_application();
        app.contact_email = "not-an-email".to_string();
        let violations = rules().validate(&app).unwrap_err();
        assert!(violations.iter().any(|v| v.field == "contact_email"));
    }

    #[test]
    fn phone_length_bounds_are_enforced() {
        let mut app = valid_application();
        app.phone_number = "12345".to_string();
        let violations = rules().validate(&app).unwrap_err();
        assert!(violations.iter().any(|v| v.field == "phone_number"));

        let mut app = valid_application();
        app.phone_number = "123456789012345678901".to_string();
        let violations = rules().validate(&app).unwrap_err();
        assert!(violations.iter().any(|v| v.field == "phone_number"));
    }

    #[test]
    fn unknown_license_type_is_rejected() {
        let mut app = valid_application();
        app.license_type = "smuggling".to_string();
        let violations = rules().validate(&app).unwrap_err();
        assert!(violations.iter().any(|v| v.field == "license_type"));
    }

    #[test]
    fn all_violations_are_collected() {
        let app = NewApplication {
            license_type: "bogus".to_string(),
            business_name: "x".to_string(),
            registration_number: "!!".to_string(),
            business_address: "y".to_string(),
            contact_person: "z".to_string(),
            contact_email: "nope".to_string(),
            phone_number: "1".to_string(),
            business_type: "a".to_string(),
            business_description: "short".to_string(),
        };
        let violations = rules().validate(&app).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field).collect();
        for field in [
            "license_type",
            "business_name",
            "registration_number",
            "business_address",
            "contact_person",
            "contact_email",
            "phone_number",
            "business_type",
            "business_description",
        ] {
            assert!(fields.contains(&field), "missing violation for {field}");
        }
    }
}
