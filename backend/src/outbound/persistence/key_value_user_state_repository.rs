//! [`UserStateRepository`] adapter over a [`KeyValueStore`].
//!
//! The user collection is stored as a JSON array under [`USERS_KEY`] and the
//! acting user as a single JSON record under [`CURRENT_USER_KEY`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::User;
use crate::domain::ports::{UserStateRepository, UserStateRepositoryError};

use super::key_value::KeyValueStore;

/// Key holding the JSON array of user records.
pub const USERS_KEY: &str = "dashboard_users";
/// Key holding the JSON record of the acting user.
pub const CURRENT_USER_KEY: &str = "dashboard_current_user";

/// JSON codec between user state and a string key-value medium.
///
/// Decoding goes through the record newtypes, so stored values that break a
/// field rule are reported as corrupt rather than loaded.
#[derive(Debug, Clone, Default)]
pub struct KeyValueUserStateRepository<S> {
    store: S,
}

impl<S> KeyValueUserStateRepository<S> {
    /// Wrap `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying medium.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S> KeyValueUserStateRepository<S>
where
    S: KeyValueStore,
{
    fn load<T>(&self, key: &str) -> Result<Option<T>, UserStateRepositoryError>
    where
        T: DeserializeOwned,
    {
        let Some(raw) = self
            .store
            .get(key)
            .map_err(|err| UserStateRepositoryError::read(key, err.into_message()))?
        else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| UserStateRepositoryError::corrupt(key, err.to_string()))
    }

    fn save<T>(&self, key: &str, value: &T) -> Result<(), UserStateRepositoryError>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)
            .map_err(|err| UserStateRepositoryError::serialization(err.to_string()))?;
        self.store
            .set(key, &raw)
            .map_err(|err| UserStateRepositoryError::write(key, err.into_message()))
    }
}

impl<S> UserStateRepository for KeyValueUserStateRepository<S>
where
    S: KeyValueStore,
{
    fn load_users(&self) -> Result<Option<Vec<User>>, UserStateRepositoryError> {
        self.load(USERS_KEY)
    }

    fn save_users(&self, users: &[User]) -> Result<(), UserStateRepositoryError> {
        self.save(USERS_KEY, users)
    }

    fn load_current_user(&self) -> Result<Option<User>, UserStateRepositoryError> {
        self.load(CURRENT_USER_KEY)
    }

    fn save_current_user(&self, user: &User) -> Result<(), UserStateRepositoryError> {
        self.save(CURRENT_USER_KEY, user)
    }
}
