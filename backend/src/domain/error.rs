//! Store-level error types.
//!
//! These errors are presentation agnostic. The console adapter renders them
//! as text; any other front end maps [`StoreError::code`] and
//! [`StoreFailure`] to its own notification style.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::user::{UserField, UserId};
use crate::domain::validation::ValidationError;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The candidate failed validation.
    InvalidRequest,
    /// The acting user may not perform the operation.
    Forbidden,
    /// The target record does not exist.
    NotFound,
}

impl ErrorCode {
    /// Code as a snake-case string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
        }
    }
}

/// Failure returned by a store operation.
///
/// Every variant leaves the user collection untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The candidate violated one or more field rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The acting user's role does not allow the operation.
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Why the operation was refused.
        message: String,
    },
    /// No record has the requested identifier.
    #[error("user {id} not found")]
    NotFound {
        /// The identifier that matched nothing.
        id: UserId,
    },
}

impl StoreError {
    /// Convenience constructor for [`StoreError::PermissionDenied`].
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::InvalidRequest,
            Self::PermissionDenied { .. } => ErrorCode::Forbidden,
            Self::NotFound { .. } => ErrorCode::NotFound,
        }
    }

    /// Payload recorded in the store's error slot for this failure.
    #[must_use]
    pub fn to_failure(&self) -> StoreFailure {
        match self {
            Self::Validation(error) => StoreFailure::Fields(error.fields().clone()),
            Self::PermissionDenied { .. } | Self::NotFound { .. } => {
                StoreFailure::Message(self.to_string())
            }
        }
    }
}

/// Last failure observed by the store, as exposed to readers.
///
/// Validation failures keep their field map; permission, lookup and storage
/// failures carry a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StoreFailure {
    /// Field-to-message map from a validation failure.
    Fields(BTreeMap<UserField, String>),
    /// Single human-readable message.
    Message(String),
}

impl std::fmt::Display for StoreFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fields(fields) => {
                let mut first = true;
                for (field, message) in fields {
                    if !first {
                        f.write_str("; ")?;
                    }
                    first = false;
                    write!(f, "{field}: {message}")?;
                }
                Ok(())
            }
            Self::Message(message) => f.write_str(message),
        }
    }
}
