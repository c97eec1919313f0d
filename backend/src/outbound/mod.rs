//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: key-value storage of the user collection and the acting
//!   user, backed by a data directory or process memory.
//!
//! Adapters are thin translators between domain types and stored
//! representations. They contain no business logic.

pub mod persistence;
