//! Port for durable storage of the user collection and current-user pointer.
//!
//! The store treats this port as best effort: reads that fail fall back to
//! the seed set and writes that fail are logged, so adapters should report
//! problems precisely rather than retry.

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Errors raised by user state repository adapters.
    pub enum UserStateRepositoryError {
        /// The underlying medium could not be read.
        Read {
            /// Storage key being read.
            key: String,
            /// Medium-specific failure detail.
            message: String,
        } => "failed to read '{key}': {message}",
        /// The underlying medium rejected a write.
        Write {
            /// Storage key being written.
            key: String,
            /// Medium-specific failure detail.
            message: String,
        } => "failed to write '{key}': {message}",
        /// A stored value exists but does not decode into valid records.
        Corrupt {
            /// Storage key holding the value.
            key: String,
            /// Decoder failure detail.
            message: String,
        } => "stored value under '{key}' is corrupt: {message}",
        /// Records could not be encoded for storage.
        Serialization {
            /// Encoder failure detail.
            message: String,
        } => "failed to serialise user state: {message}",
    }
}

/// Load and save the two persisted entries of the user store.
///
/// `Ok(None)` from a load means the entry has never been written.
#[cfg_attr(test, mockall::automock)]
pub trait UserStateRepository: Send + Sync {
    /// Load the persisted user collection.
    fn load_users(&self) -> Result<Option<Vec<User>>, UserStateRepositoryError>;

    /// Replace the persisted user collection.
    fn save_users(&self, users: &[User]) -> Result<(), UserStateRepositoryError>;

    /// Load the persisted current-user record.
    fn load_current_user(&self) -> Result<Option<User>, UserStateRepositoryError>;

    /// Replace the persisted current-user record.
    fn save_current_user(&self, user: &User) -> Result<(), UserStateRepositoryError>;
}

/// Fixture implementation that holds nothing and discards writes.
///
/// Use it where persistence is not under test; a store opened over it starts
/// from the seed set every time.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserStateRepository;

impl UserStateRepository for FixtureUserStateRepository {
    fn load_users(&self) -> Result<Option<Vec<User>>, UserStateRepositoryError> {
        Ok(None)
    }

    fn save_users(&self, _users: &[User]) -> Result<(), UserStateRepositoryError> {
        Ok(())
    }

    fn load_current_user(&self) -> Result<Option<User>, UserStateRepositoryError> {
        Ok(None)
    }

    fn save_current_user(&self, _user: &User) -> Result<(), UserStateRepositoryError> {
        Ok(())
    }
}
