//! Built-in seed set used when no valid state has been persisted.

use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, Role, User, UserId, UserName, UserValidationError};

const SEED_USERS: [(&str, &str, Role); 3] = [
    ("Alice Johnson", "alice@example.com", Role::Admin),
    ("Bob Smith", "bob@example.com", Role::Editor),
    ("Charlie Brown", "charlie@example.com", Role::Viewer),
];

/// Build the seed set: one account per role, each with a fresh identifier.
///
/// # Errors
///
/// Returns [`UserValidationError`] if a built-in entry breaks a field rule.
/// The entries are constants, so this only fires on a bad edit to the table.
///
/// # Examples
/// ```
/// use admin_console::domain::seed_users;
/// use chrono::Utc;
///
/// let users = seed_users(Utc::now()).expect("seed set is valid");
/// assert_eq!(users.len(), 3);
/// ```
pub fn seed_users(created_at: DateTime<Utc>) -> Result<Vec<User>, UserValidationError> {
    SEED_USERS
        .into_iter()
        .map(|(name, email, role)| {
            Ok(User::new(
                UserId::random(),
                UserName::new(name)?,
                EmailAddress::new(email)?,
                role,
                created_at,
            ))
        })
        .collect()
}
