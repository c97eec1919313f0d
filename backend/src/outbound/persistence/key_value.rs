//! String key-value storage medium underneath the user state repository.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Failures raised by a key-value medium.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyValueError {
    /// The key cannot be mapped onto the medium.
    #[error("invalid storage key '{key}': {reason}")]
    InvalidKey {
        /// Rejected key.
        key: String,
        /// Rule the key broke.
        reason: &'static str,
    },
    /// The backing directory could not be created or opened.
    #[error("failed to open data directory {}: {message}", .path.display())]
    Open {
        /// Directory that failed to open.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },
    /// A stored value could not be read.
    #[error("failed to read '{key}': {message}")]
    Read {
        /// Key being read.
        key: String,
        /// Underlying failure.
        message: String,
    },
    /// A value could not be stored.
    #[error("failed to write '{key}': {message}")]
    Write {
        /// Key being written.
        key: String,
        /// Underlying failure.
        message: String,
    },
}

impl KeyValueError {
    /// Underlying failure text without the key prefix.
    #[must_use]
    pub fn into_message(self) -> String {
        match self {
            Self::Open { message, .. } | Self::Read { message, .. } | Self::Write { message, .. } => {
                message
            }
            invalid @ Self::InvalidKey { .. } => invalid.to_string(),
        }
    }
}

/// Minimal string key-value medium.
///
/// Keys are restricted to ASCII letters, digits, `_` and `-` so every
/// implementation can map them onto file names safely.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`; `Ok(None)` when it was never set.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        (**self).set(key, value)
    }
}

/// Reject keys that could escape a directory or collide after mapping.
pub(crate) fn validate_key(key: &str) -> Result<(), KeyValueError> {
    let invalid = |reason| KeyValueError::InvalidKey {
        key: key.to_owned(),
        reason,
    };
    if key.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !key
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    {
        return Err(invalid("only ASCII letters, digits, '_' and '-' are allowed"));
    }
    Ok(())
}

/// In-process medium; contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        validate_key(key)?;
        let entries = self.entries.lock().map_err(|_| KeyValueError::Read {
            key: key.to_owned(),
            message: "entry lock poisoned".to_owned(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().map_err(|_| KeyValueError::Write {
            key: key.to_owned(),
            message: "entry lock poisoned".to_owned(),
        })?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
