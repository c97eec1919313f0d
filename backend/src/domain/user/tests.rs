//! Tests for the user record model.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 12, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
fn ada(created_at: DateTime<Utc>) -> User {
    User::try_from_strings(
        VALID_ID,
        "Ada Lovelace",
        "ada@example.com",
        Role::Editor,
        created_at,
    )
    .expect("valid fixture user")
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn rejects_invalid_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn random_ids_are_distinct() {
    assert_ne!(UserId::random(), UserId::random());
}

#[rstest]
#[case("")]
#[case("a")]
#[case("  b  ")]
#[case("   ")]
fn rejects_names_shorter_than_two_trimmed_characters(#[case] raw: &str) {
    let err = UserName::new(raw).expect_err("short name must be rejected");
    assert_eq!(err, UserValidationError::NameTooShort { min: USER_NAME_MIN });
    assert_eq!(err.field(), UserField::Name);
    assert_eq!(err.to_string(), "Name must be at least 2 characters long");
}

#[rstest]
fn keeps_names_exactly_as_entered() {
    let name = UserName::new("  Al ").expect("two trimmed characters is enough");
    assert_eq!(name.as_ref(), "  Al ");
}

#[rstest]
#[case("ada@example.com")]
#[case("a.b+c@sub.example.org")]
#[case("x@y.z")]
fn accepts_well_formed_emails(#[case] raw: &str) {
    assert!(EmailAddress::new(raw).is_ok());
}

#[rstest]
#[case("")]
#[case("ada")]
#[case("ada@example")]
#[case("@example.com")]
#[case("ada@.com")]
#[case("ada lovelace@example.com")]
#[case("ada@@example.com")]
fn rejects_malformed_emails(#[case] raw: &str) {
    assert_eq!(
        EmailAddress::new(raw),
        Err(UserValidationError::EmailInvalid)
    );
}

#[rstest]
fn serialises_new_records_without_updated_at(ada: User) {
    let value = serde_json::to_value(&ada).expect("serialise user");
    assert_eq!(
        value,
        json!({
            "id": VALID_ID,
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "role": "Editor",
            "createdAt": "2026-01-12T09:30:00Z",
        })
    );
}

#[rstest]
fn revise_replaces_present_fields_and_stamps_updated_at(ada: User, created_at: DateTime<Utc>) {
    let later = created_at + chrono::Duration::hours(1);
    let changes = UserChanges {
        name: None,
        email: Some(EmailAddress::new("countess@example.com").expect("valid email")),
        role: Some(Role::Admin),
    };

    let revised = ada.clone().revise(changes, later);

    assert_eq!(revised.id(), ada.id());
    assert_eq!(revised.name(), ada.name());
    assert_eq!(revised.email().as_ref(), "countess@example.com");
    assert_eq!(revised.role(), Role::Admin);
    assert_eq!(revised.created_at(), created_at);
    assert_eq!(revised.updated_at(), Some(later));
}

#[rstest]
fn round_trips_updated_records(ada: User, created_at: DateTime<Utc>) {
    let revised = ada.revise(UserChanges::default(), created_at);
    let json = serde_json::to_string(&revised).expect("serialise user");
    let decoded: User = serde_json::from_str(&json).expect("decode user");
    assert_eq!(decoded, revised);
}

#[rstest]
#[case(json!({"id": VALID_ID, "name": "A", "email": "a@example.com", "role": "Admin", "createdAt": "2026-01-12T09:30:00Z"}))]
#[case(json!({"id": VALID_ID, "name": "Ada", "email": "nope", "role": "Admin", "createdAt": "2026-01-12T09:30:00Z"}))]
#[case(json!({"id": VALID_ID, "name": "Ada", "email": "a@example.com", "role": "Owner", "createdAt": "2026-01-12T09:30:00Z"}))]
#[case(json!({"id": "42", "name": "Ada", "email": "a@example.com", "role": "Admin", "createdAt": "2026-01-12T09:30:00Z"}))]
#[case(json!({"id": VALID_ID, "name": "Ada", "email": "a@example.com", "role": "Admin"}))]
#[case(json!({"id": VALID_ID, "name": "Ada", "email": "a@example.com", "role": "Admin", "createdAt": "2026-01-12T09:30:00Z", "extra": true}))]
fn decoding_rejects_records_that_break_field_rules(#[case] value: serde_json::Value) {
    assert!(serde_json::from_value::<User>(value).is_err());
}

#[rstest]
fn new_user_receives_fresh_identifier(created_at: DateTime<Utc>) {
    let new_user = NewUser {
        name: UserName::new("Grace Hopper").expect("valid name"),
        email: EmailAddress::new("grace@example.com").expect("valid email"),
        role: Role::Viewer,
    };

    let first = new_user.clone().into_user(created_at);
    let second = new_user.into_user(created_at);

    assert_ne!(first.id(), second.id());
    assert_eq!(first.created_at(), created_at);
    assert!(first.updated_at().is_none());
}

#[rstest]
fn candidate_builders_set_fields() {
    let candidate = UserCandidate::default()
        .with_name("Ada")
        .with_email("ada@example.com")
        .with_role(Role::Viewer);
    assert_eq!(candidate, UserCandidate::new("Ada", "ada@example.com", Role::Viewer));
}
