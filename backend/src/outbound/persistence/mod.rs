//! Persistence adapters for the user state port.
//!
//! State is kept in a string key-value medium:
//!
//! - **`KeyValueUserStateRepository`**: JSON codec implementing
//!   [`UserStateRepository`](crate::domain::ports::UserStateRepository) over
//!   any [`KeyValueStore`].
//! - **`FileKeyValueStore`**: one `<key>.json` file per entry in a data
//!   directory, replaced atomically on every write.
//! - **`MemoryKeyValueStore`**: in-process medium for tests and throwaway
//!   sessions.
//!
//! Adapters translate between domain records and stored text. They contain no
//! business logic; falling back on bad data is the store's decision.
//!
//! # Example
//!
//! ```
//! use admin_console::domain::ports::UserStateRepository;
//! use admin_console::outbound::persistence::{
//!     KeyValueUserStateRepository, MemoryKeyValueStore,
//! };
//!
//! let repository = KeyValueUserStateRepository::new(MemoryKeyValueStore::new());
//! assert_eq!(repository.load_users(), Ok(None));
//! ```

mod atomic_io;
mod file_key_value_store;
mod key_value;
mod key_value_user_state_repository;

pub use file_key_value_store::FileKeyValueStore;
pub use key_value::{KeyValueError, KeyValueStore, MemoryKeyValueStore};
pub use key_value_user_state_repository::{
    CURRENT_USER_KEY, KeyValueUserStateRepository, USERS_KEY,
};
