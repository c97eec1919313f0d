//! Closed set of account roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role granted to a user account.
///
/// The set is closed: serialised values outside `Admin`, `Editor` and
/// `Viewer` are rejected during deserialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Full control over every account.
    Admin,
    /// May edit non-admin accounts.
    Editor,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Every role, in descending order of privilege.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Editor, Self::Viewer];

    /// Stable string form used in storage and console output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the closed [`Role`] values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{value}'; expected Admin, Editor or Viewer")]
pub struct UnknownRoleError {
    value: String,
}

impl UnknownRoleError {
    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Parse a role name, ignoring ASCII case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownRoleError {
                value: value.to_owned(),
            })
    }
}
