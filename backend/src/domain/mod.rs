//! Domain model and services for the user record store.
//!
//! Purpose: keep the user records, their field rules and the role-based
//! permission table independent of storage and presentation. Adapters in
//! `outbound` implement [`ports`]; adapters in `inbound` drive
//! [`UserStore`].
//!
//! Public surface:
//! - [`User`], [`UserId`], [`UserCandidate`] and the field newtypes.
//! - [`Role`] and the guard functions [`can_add`], [`can_edit`], [`can_delete`].
//! - [`validate`] and [`ValidationError`].
//! - [`UserStore`], [`StoreState`], [`StoreError`] and [`StoreFailure`].
//! - Listing helpers: [`UserFilter`], [`PageRequest`], [`Page`], [`RoleSummary`].

pub mod authorization;
pub mod error;
pub mod ports;
pub mod role;
pub mod seed;
pub mod user;
pub mod user_query;
pub mod user_store;
pub mod validation;

pub use self::authorization::{can_add, can_delete, can_edit};
pub use self::error::{ErrorCode, StoreError, StoreFailure};
pub use self::role::{Role, UnknownRoleError};
pub use self::seed::seed_users;
pub use self::user::{
    EmailAddress, NewUser, USER_NAME_MIN, User, UserCandidate, UserChanges, UserField, UserId,
    UserName, UserValidationError, is_valid_email,
};
pub use self::user_query::{
    DEFAULT_PER_PAGE, Page, PageRequest, RoleSummary, UserFilter, paginate, query_users,
};
pub use self::user_store::{StoreState, UserStore};
pub use self::validation::{ValidationError, ValidationMode, validate, validate_new};
