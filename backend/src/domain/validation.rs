//! Rule table for user candidates.
//!
//! Validation is pure: it inspects a [`UserCandidate`] and either returns the
//! typed field values or a [`ValidationError`] listing every violated field.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::user::{
    EmailAddress, NewUser, UserCandidate, UserChanges, UserField, UserName, UserValidationError,
};

/// Which rule set applies to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Creating a record: name, email and role are required.
    Create,
    /// Updating a record: absent fields are left unchecked.
    Update,
}

/// Field-to-message report of every rule a candidate violated.
///
/// ## Invariants
/// - Contains at least one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed: {}", describe(.fields))]
pub struct ValidationError {
    fields: BTreeMap<UserField, String>,
}

fn describe(fields: &BTreeMap<UserField, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    fn from_violations(violations: Vec<UserValidationError>) -> Option<Self> {
        if violations.is_empty() {
            return None;
        }
        let fields = violations
            .into_iter()
            .map(|violation| (violation.field(), violation.to_string()))
            .collect();
        Some(Self { fields })
    }

    fn single(violation: UserValidationError) -> Self {
        Self {
            fields: BTreeMap::from([(violation.field(), violation.to_string())]),
        }
    }

    /// Messages keyed by the field they concern.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<UserField, String> {
        &self.fields
    }

    /// Message reported for `field`, if that field failed.
    #[must_use]
    pub fn message(&self, field: UserField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
        }
    }
}

fn check_name(
    name: Option<&str>,
    mode: ValidationMode,
) -> Result<Option<UserName>, UserValidationError> {
    match (name, mode) {
        (None, ValidationMode::Create) => Err(UserValidationError::NameRequired),
        (Some(raw), ValidationMode::Create) if raw.trim().is_empty() => {
            Err(UserValidationError::NameRequired)
        }
        (None, ValidationMode::Update) => Ok(None),
        (Some(raw), _) => UserName::new(raw).map(Some),
    }
}

fn check_email(
    email: Option<&str>,
    mode: ValidationMode,
) -> Result<Option<EmailAddress>, UserValidationError> {
    match (email, mode) {
        (None, ValidationMode::Create) => Err(UserValidationError::EmailRequired),
        (Some(""), ValidationMode::Create) => Err(UserValidationError::EmailRequired),
        (None, ValidationMode::Update) => Ok(None),
        (Some(raw), _) => EmailAddress::new(raw).map(Some),
    }
}

/// Check `candidate` against the rules for `mode`.
///
/// All violations are collected before failing, so a candidate with a short
/// name and a malformed email yields both entries.
///
/// # Errors
///
/// Returns [`ValidationError`] when any rule is violated.
///
/// # Examples
/// ```
/// use admin_console::domain::{UserCandidate, UserField, ValidationMode, validate};
///
/// let candidate = UserCandidate::default().with_name("A").with_email("nope");
/// let err = validate(&candidate, ValidationMode::Update).expect_err("two violations");
/// assert!(err.message(UserField::Name).is_some());
/// assert!(err.message(UserField::Email).is_some());
/// ```
pub fn validate(
    candidate: &UserCandidate,
    mode: ValidationMode,
) -> Result<UserChanges, ValidationError> {
    let mut violations = Vec::new();

    let name = check_name(candidate.name.as_deref(), mode)
        .map_err(|violation| violations.push(violation))
        .ok()
        .flatten();
    let email = check_email(candidate.email.as_deref(), mode)
        .map_err(|violation| violations.push(violation))
        .ok()
        .flatten();
    if mode == ValidationMode::Create && candidate.role.is_none() {
        violations.push(UserValidationError::RoleRequired);
    }

    if let Some(error) = ValidationError::from_violations(violations) {
        return Err(error);
    }

    Ok(UserChanges {
        name,
        email,
        role: candidate.role,
    })
}

/// Validate a candidate for creation and return the complete field set.
///
/// # Errors
///
/// Returns [`ValidationError`] when any create-mode rule is violated.
pub fn validate_new(candidate: &UserCandidate) -> Result<NewUser, ValidationError> {
    let UserChanges { name, email, role } = validate(candidate, ValidationMode::Create)?;
    let name = name.ok_or_else(|| ValidationError::single(UserValidationError::NameRequired))?;
    let email = email.ok_or_else(|| ValidationError::single(UserValidationError::EmailRequired))?;
    let role = role.ok_or_else(|| ValidationError::single(UserValidationError::RoleRequired))?;
    Ok(NewUser { name, email, role })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use rstest::rstest;

    #[rstest]
    fn create_mode_reports_every_missing_field() {
        let err = validate(&UserCandidate::default(), ValidationMode::Create)
            .expect_err("empty candidate must fail");

        assert_eq!(err.message(UserField::Name), Some("Name is required"));
        assert_eq!(err.message(UserField::Email), Some("Email is required"));
        assert_eq!(err.message(UserField::Role), Some("Role is required"));
        assert_eq!(err.fields().len(), 3);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn create_mode_treats_blank_names_as_missing(#[case] name: &str) {
        let candidate = UserCandidate::new(name, "ada@example.com", Role::Viewer);
        let err = validate(&candidate, ValidationMode::Create).expect_err("blank name");
        assert_eq!(err.message(UserField::Name), Some("Name is required"));
    }

    #[rstest]
    fn create_mode_treats_empty_email_as_missing() {
        let candidate = UserCandidate::new("Ada", "", Role::Viewer);
        let err = validate(&candidate, ValidationMode::Create).expect_err("empty email");
        assert_eq!(err.message(UserField::Email), Some("Email is required"));
    }

    #[rstest]
    #[case(ValidationMode::Create)]
    #[case(ValidationMode::Update)]
    fn short_names_fail_in_both_modes(#[case] mode: ValidationMode) {
        let candidate = UserCandidate::new("A", "ada@example.com", Role::Viewer);
        let err = validate(&candidate, mode).expect_err("short name");
        assert_eq!(
            err.message(UserField::Name),
            Some("Name must be at least 2 characters long")
        );
        assert_eq!(err.fields().len(), 1);
    }

    #[rstest]
    #[case(ValidationMode::Create)]
    #[case(ValidationMode::Update)]
    fn malformed_emails_fail_in_both_modes(#[case] mode: ValidationMode) {
        let candidate = UserCandidate::new("Ada", "ada.example.com", Role::Viewer);
        let err = validate(&candidate, mode).expect_err("bad email");
        assert_eq!(err.message(UserField::Email), Some("Invalid email format"));
    }

    #[rstest]
    fn update_mode_skips_absent_fields() {
        let changes = validate(&UserCandidate::default(), ValidationMode::Update)
            .expect("nothing to check");
        assert_eq!(changes, UserChanges::default());
    }

    #[rstest]
    fn update_mode_rejects_blank_names_that_are_present() {
        let candidate = UserCandidate::default().with_name("  ");
        let err = validate(&candidate, ValidationMode::Update).expect_err("blank name");
        assert_eq!(
            err.message(UserField::Name),
            Some("Name must be at least 2 characters long")
        );
    }

    #[rstest]
    fn successful_validation_returns_values_unchanged() {
        let candidate = UserCandidate::new(" Ada ", "ada@example.com", Role::Admin);
        let new_user = validate_new(&candidate).expect("valid candidate");

        assert_eq!(new_user.name.as_ref(), " Ada ");
        assert_eq!(new_user.email.as_ref(), "ada@example.com");
        assert_eq!(new_user.role, Role::Admin);
    }

    #[rstest]
    #[case(UserCandidate::default())]
    #[case(UserCandidate::default().with_name("Ada").with_email("ada@example.com"))]
    fn validate_new_failures_always_name_a_field(#[case] candidate: UserCandidate) {
        let err = validate_new(&candidate).expect_err("incomplete candidate");

        assert!(!err.fields().is_empty());
        assert!(err.message(UserField::Role).is_some());
    }

    #[rstest]
    fn single_violation_errors_hold_one_entry() {
        let err = ValidationError::single(UserValidationError::RoleRequired);

        assert_eq!(err.fields().len(), 1);
        assert_eq!(err.message(UserField::Role), Some("Role is required"));
    }

    #[rstest]
    fn error_serialises_as_field_map() {
        let candidate = UserCandidate::new("A", "nope", Role::Admin);
        let err = validate_new(&candidate).expect_err("two violations");
        let value = serde_json::to_value(&err).expect("serialise error");

        assert_eq!(
            value,
            serde_json::json!({
                "name": "Name must be at least 2 characters long",
                "email": "Invalid email format",
            })
        );
        assert!(err.to_string().starts_with("validation failed: name:"));
    }
}
