//! Authoritative user record store.
//!
//! [`UserStore`] owns the user collection and the current-user snapshot. Every
//! mutation runs the authorization guard, then the validator, then applies the
//! change in memory and writes it through the [`UserStateRepository`] port.
//! Persistence is best effort: a failed write is logged and recorded in the
//! error slot, but the in-memory state stays authoritative and the operation
//! still succeeds.

use std::collections::HashSet;
use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::authorization::{can_add, can_delete, can_edit};
use crate::domain::ports::{UserStateRepository, UserStateRepositoryError};
use crate::domain::seed::seed_users;
use crate::domain::user_query::{Page, PageRequest, RoleSummary, UserFilter, query_users};
use crate::domain::validation::{ValidationMode, validate, validate_new};
use crate::domain::{Role, StoreError, StoreFailure, User, UserCandidate, UserId};

/// Observable state of the store.
///
/// ## Invariants
/// - `users` never holds two records with the same id.
/// - `is_loading` is only `true` while a mutation is running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    users: Vec<User>,
    current_user: Option<User>,
    is_loading: bool,
    error: Option<StoreFailure>,
}

impl StoreState {
    /// Records in insertion order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Snapshot of the acting user taken when it was selected.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Whether a mutation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Last recorded failure.
    #[must_use]
    pub const fn error(&self) -> Option<&StoreFailure> {
        self.error.as_ref()
    }
}

/// Single-writer store for user records.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use admin_console::domain::ports::FixtureUserStateRepository;
/// use admin_console::domain::{Role, UserCandidate, UserStore};
/// use mockable::DefaultClock;
///
/// let mut store = UserStore::open(Arc::new(FixtureUserStateRepository), Arc::new(DefaultClock));
/// assert_eq!(store.users().len(), 3);
///
/// let added = store
///     .add(&UserCandidate::new("Grace Hopper", "grace@example.com", Role::Viewer))
///     .expect("seeded admin may add users");
/// assert!(store.find(added.id()).is_some());
/// ```
pub struct UserStore<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    state: StoreState,
}

impl<R> UserStore<R> {
    /// Borrow the full observable state.
    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    /// Owned copy of the observable state; changing it does not affect the
    /// store.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.state.clone()
    }

    /// Records in insertion order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        self.state.users()
    }

    /// Snapshot of the acting user.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.state.current_user()
    }

    /// Whether a mutation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Last recorded failure.
    #[must_use]
    pub const fn error(&self) -> Option<&StoreFailure> {
        self.state.error()
    }

    /// Look a record up by id.
    #[must_use]
    pub fn find(&self, id: &UserId) -> Option<&User> {
        self.state.users.iter().find(|user| user.id() == id)
    }

    /// Per-role account counts.
    #[must_use]
    pub fn summary(&self) -> RoleSummary {
        RoleSummary::from_users(&self.state.users)
    }

    /// Filtered, paginated view of the records.
    #[must_use]
    pub fn query(&self, filter: &UserFilter, request: PageRequest) -> Page<User> {
        query_users(&self.state.users, filter, request)
    }

    /// Reset the error slot.
    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    fn acting_role(&self) -> Result<Role, StoreError> {
        self.state
            .current_user
            .as_ref()
            .map(User::role)
            .ok_or_else(|| StoreError::permission_denied("no acting user selected"))
    }

    fn fail(&mut self, operation: &'static str, error: StoreError) -> StoreError {
        warn!(
            operation,
            code = error.code().as_str(),
            error = %error,
            "user store operation rejected"
        );
        self.state.error = Some(error.to_failure());
        self.state.is_loading = false;
        error
    }

    fn succeed(&mut self, storage_failure: Option<StoreFailure>) {
        self.state.error = storage_failure;
        self.state.is_loading = false;
    }
}

impl<R> UserStore<R>
where
    R: UserStateRepository,
{
    /// Open the store from persisted state.
    ///
    /// Missing, unreadable or corrupt user data falls back to the seed set,
    /// which is then written back. A persisted current-user snapshot that
    /// decodes is restored as-is, even when its record has since been edited
    /// or removed. Only a missing or unreadable snapshot selects the first
    /// admin (or first record). Nothing here fails.
    pub fn open(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self {
            repository,
            clock,
            state: StoreState::default(),
        };

        let (users, seeded) = store.load_or_seed_users();
        store.state.users = users;
        if seeded {
            store.state.error = store.persist_users();
        }

        if let Some(current) = store.restore_current_user() {
            store.state.current_user = Some(current);
        } else if let Some(fallback) = default_current_user(&store.state.users).cloned() {
            debug!(user_id = %fallback.id(), "selecting default acting user");
            store.state.current_user = Some(fallback);
            if let Some(failure) = store.persist_current_user() {
                store.state.error = Some(failure);
            }
        }

        info!(users = store.state.users.len(), seeded, "user store opened");
        store
    }

    /// Create a record from `candidate`.
    ///
    /// Requires an acting admin. On success the record receives a fresh id
    /// and `created_at`, is appended, and the collection is persisted.
    ///
    /// # Errors
    ///
    /// [`StoreError::PermissionDenied`] when the acting user may not add, and
    /// [`StoreError::Validation`] when the candidate breaks a create rule.
    pub fn add(&mut self, candidate: &UserCandidate) -> Result<User, StoreError> {
        self.state.is_loading = true;
        let user = match self.apply_add(candidate) {
            Ok(user) => user,
            Err(error) => return Err(self.fail("add", error)),
        };
        let storage_failure = self.persist_users();
        self.succeed(storage_failure);
        info!(user_id = %user.id(), role = %user.role(), "user added");
        Ok(user)
    }

    /// Apply `candidate` to the record identified by `id`.
    ///
    /// Authorization uses the role currently stored for the target, never the
    /// role carried in the candidate. A candidate that changes the role must
    /// also name a role the acting user could edit. Absent fields keep their
    /// values; `updated_at` is stamped.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no record has `id`,
    /// [`StoreError::PermissionDenied`] when the guard refuses, and
    /// [`StoreError::Validation`] when a present field breaks a rule.
    pub fn update(&mut self, id: &UserId, candidate: &UserCandidate) -> Result<User, StoreError> {
        self.state.is_loading = true;
        let user = match self.apply_update(id, candidate) {
            Ok(user) => user,
            Err(error) => return Err(self.fail("update", error)),
        };
        let storage_failure = self.persist_users();
        self.succeed(storage_failure);
        info!(user_id = %user.id(), role = %user.role(), "user updated");
        Ok(user)
    }

    /// Delete the record identified by `id`.
    ///
    /// Removing an id that is not present succeeds and changes nothing.
    /// Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// [`StoreError::PermissionDenied`] when the acting user may not delete.
    pub fn remove(&mut self, id: &UserId) -> Result<bool, StoreError> {
        self.state.is_loading = true;
        let removed = match self.apply_remove(id) {
            Ok(removed) => removed,
            Err(error) => return Err(self.fail("remove", error)),
        };
        let storage_failure = self.persist_users();
        self.succeed(storage_failure);
        info!(user_id = %id, removed, "user removal applied");
        Ok(removed)
    }

    /// Act as `user` from now on and persist the choice.
    ///
    /// Selecting the acting user is not itself guarded.
    pub fn set_current_user(&mut self, user: User) {
        debug!(user_id = %user.id(), role = %user.role(), "switching acting user");
        self.state.current_user = Some(user);
        if let Some(failure) = self.persist_current_user() {
            self.state.error = Some(failure);
        }
    }

    fn apply_add(&mut self, candidate: &UserCandidate) -> Result<User, StoreError> {
        let acting = self.acting_role()?;
        if !can_add(acting) {
            return Err(StoreError::permission_denied(format!(
                "{acting} may not add users"
            )));
        }
        let new_user = validate_new(candidate)?;
        let user = new_user.into_user(self.clock.utc());
        self.state.users.push(user.clone());
        Ok(user)
    }

    fn apply_update(&mut self, id: &UserId, candidate: &UserCandidate) -> Result<User, StoreError> {
        let acting = self.acting_role()?;
        let Some(slot) = self.state.users.iter_mut().find(|user| user.id() == id) else {
            return Err(StoreError::NotFound { id: *id });
        };

        let stored_role = slot.role();
        if !can_edit(acting, stored_role) {
            return Err(StoreError::permission_denied(format!(
                "{acting} may not edit {stored_role} accounts"
            )));
        }
        if let Some(new_role) = candidate.role.filter(|role| !can_edit(acting, *role)) {
            return Err(StoreError::permission_denied(format!(
                "{acting} may not grant the {new_role} role"
            )));
        }

        let changes = validate(candidate, ValidationMode::Update)?;
        let updated = slot.clone().revise(changes, self.clock.utc());
        *slot = updated.clone();
        Ok(updated)
    }

    fn apply_remove(&mut self, id: &UserId) -> Result<bool, StoreError> {
        let acting = self.acting_role()?;
        if !can_delete(acting) {
            return Err(StoreError::permission_denied(format!(
                "{acting} may not delete users"
            )));
        }
        let before = self.state.users.len();
        self.state.users.retain(|user| user.id() != id);
        Ok(self.state.users.len() != before)
    }

    fn load_or_seed_users(&self) -> (Vec<User>, bool) {
        match self.repository.load_users() {
            Ok(Some(users)) => {
                if has_unique_ids(&users) {
                    return (users, false);
                }
                warn!("persisted users contain duplicate ids; falling back to seed set");
            }
            Ok(None) => info!("no persisted users; starting from seed set"),
            Err(error) => {
                warn!(error = %error, "persisted users unavailable; falling back to seed set");
            }
        }

        match seed_users(self.clock.utc()) {
            Ok(users) => (users, true),
            Err(error) => {
                warn!(error = %error, "seed set is invalid; starting empty");
                (Vec::new(), true)
            }
        }
    }

    fn restore_current_user(&self) -> Option<User> {
        match self.repository.load_current_user() {
            Ok(Some(user)) => {
                if self.find(user.id()).is_none() {
                    debug!(user_id = %user.id(), "restored acting user has no record");
                }
                Some(user)
            }
            Ok(None) => None,
            Err(error) => {
                warn!(error = %error, "persisted acting user unavailable");
                None
            }
        }
    }

    fn persist_users(&self) -> Option<StoreFailure> {
        self.repository
            .save_users(&self.state.users)
            .err()
            .map(|error| storage_failure("users", &error))
    }

    fn persist_current_user(&self) -> Option<StoreFailure> {
        let user = self.state.current_user.as_ref()?;
        self.repository
            .save_current_user(user)
            .err()
            .map(|error| storage_failure("current user", &error))
    }
}

fn storage_failure(entry: &'static str, error: &UserStateRepositoryError) -> StoreFailure {
    warn!(entry, error = %error, "failed to persist user state; in-memory state kept");
    StoreFailure::Message(error.to_string())
}

fn has_unique_ids(users: &[User]) -> bool {
    let mut seen = HashSet::with_capacity(users.len());
    users.iter().all(|user| seen.insert(*user.id()))
}

fn default_current_user(users: &[User]) -> Option<&User> {
    users
        .iter()
        .find(|user| user.role() == Role::Admin)
        .or_else(|| users.first())
}
