//! Admin console user record store.
//!
//! Holds the user accounts of an administration console, enforces the field
//! rules and the role-based permission table on every mutation, and persists
//! the collection plus the acting user through a storage port.
//!
//! - [`domain`]: records, validation, authorization and the [`UserStore`].
//! - [`outbound`]: persistence adapters for the storage port.
//! - [`inbound`]: the command-line adapter.
//! - [`config`]: settings for the console binary.
//!
//! [`UserStore`]: domain::UserStore

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
