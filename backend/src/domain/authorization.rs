//! Role-based permission decisions.
//!
//! These are plain decision tables. They never fail; the store turns a
//! `false` into a permission-denied error.

use crate::domain::Role;

/// Whether `acting` may create accounts.
#[must_use]
pub const fn can_add(acting: Role) -> bool {
    matches!(acting, Role::Admin)
}

/// Whether `acting` may edit an account currently holding `target`.
#[must_use]
pub const fn can_edit(acting: Role, target: Role) -> bool {
    match acting {
        Role::Admin => true,
        Role::Editor => !matches!(target, Role::Admin),
        Role::Viewer => false,
    }
}

/// Whether `acting` may delete accounts.
#[must_use]
pub const fn can_delete(acting: Role) -> bool {
    matches!(acting, Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::Editor, false)]
    #[case(Role::Viewer, false)]
    fn only_admins_add_and_delete(#[case] acting: Role, #[case] allowed: bool) {
        assert_eq!(can_add(acting), allowed);
        assert_eq!(can_delete(acting), allowed);
    }

    #[rstest]
    #[case(Role::Admin, Role::Admin, true)]
    #[case(Role::Admin, Role::Editor, true)]
    #[case(Role::Admin, Role::Viewer, true)]
    #[case(Role::Editor, Role::Admin, false)]
    #[case(Role::Editor, Role::Editor, true)]
    #[case(Role::Editor, Role::Viewer, true)]
    #[case(Role::Viewer, Role::Admin, false)]
    #[case(Role::Viewer, Role::Editor, false)]
    #[case(Role::Viewer, Role::Viewer, false)]
    fn edit_matrix(#[case] acting: Role, #[case] target: Role, #[case] allowed: bool) {
        assert_eq!(can_edit(acting, target), allowed);
    }
}
