//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_state_repository;

#[cfg(test)]
pub use user_state_repository::MockUserStateRepository;
pub use user_state_repository::{
    FixtureUserStateRepository, UserStateRepository, UserStateRepositoryError,
};
