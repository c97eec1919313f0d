//! Behavioural tests for the user store persisted in a data directory.
use std::path::Path;
use std::sync::Arc;

use admin_console::domain::{Role, User, UserCandidate, UserStore};
use admin_console::outbound::persistence::{
    CURRENT_USER_KEY, FileKeyValueStore, KeyValueUserStateRepository, USERS_KEY,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tempfile::TempDir;

type FileStore = UserStore<KeyValueUserStateRepository<FileKeyValueStore>>;

#[fixture]
fn data_dir() -> TempDir {
    TempDir::new().expect("create data dir")
}

fn open_store(path: &Path) -> FileStore {
    let medium = FileKeyValueStore::open(path).expect("open data dir");
    UserStore::open(
        Arc::new(KeyValueUserStateRepository::new(medium)),
        Arc::new(DefaultClock),
    )
}

fn entry_path(dir: &Path, key: &str) -> std::path::PathBuf {
    dir.join(format!("{key}.json"))
}

fn with_role(store: &FileStore, role: Role) -> User {
    store
        .users()
        .iter()
        .find(|user| user.role() == role)
        .cloned()
        .expect("seed set has every role")
}

#[rstest]
fn first_run_writes_the_seed_set(data_dir: TempDir) {
    let store = open_store(data_dir.path());

    assert_eq!(store.users().len(), 3);
    assert!(entry_path(data_dir.path(), USERS_KEY).is_file());
    assert!(entry_path(data_dir.path(), CURRENT_USER_KEY).is_file());
    assert!(store.error().is_none());
}

#[rstest]
fn reopening_is_observationally_identical(data_dir: TempDir) {
    let mut first = open_store(data_dir.path());
    let grace = first
        .add(&UserCandidate::new(
            "Grace Hopper",
            "grace@example.com",
            Role::Editor,
        ))
        .expect("admin may add");
    let bob = with_role(&first, Role::Editor);
    first
        .update(
            bob.id(),
            &UserCandidate::default().with_email("robert@example.com"),
        )
        .expect("admin may edit");
    let charlie = with_role(&first, Role::Viewer);
    assert!(first.remove(charlie.id()).expect("admin may delete"));
    first.set_current_user(grace);

    let second = open_store(data_dir.path());

    assert_eq!(second.users(), first.users());
    assert_eq!(second.current_user(), first.current_user());
    assert_eq!(second.snapshot(), first.snapshot());
}

#[rstest]
fn corrupt_users_fall_back_to_a_fresh_seed_set(data_dir: TempDir) {
    std::fs::write(entry_path(data_dir.path(), USERS_KEY), "{ not json").expect("write garbage");

    let store = open_store(data_dir.path());

    let names: Vec<&str> = store.users().iter().map(|user| user.name().as_ref()).collect();
    assert_eq!(names, vec!["Alice Johnson", "Bob Smith", "Charlie Brown"]);
    assert!(store.error().is_none());

    let rewritten =
        std::fs::read_to_string(entry_path(data_dir.path(), USERS_KEY)).expect("read users");
    let decoded: Vec<User> = serde_json::from_str(&rewritten).expect("seed set was written back");
    assert_eq!(decoded, store.users());
}

#[rstest]
fn corrupt_current_user_falls_back_to_the_first_admin(data_dir: TempDir) {
    let original = open_store(data_dir.path());
    let viewer = with_role(&original, Role::Viewer);
    std::fs::write(
        entry_path(data_dir.path(), CURRENT_USER_KEY),
        r#"{"id":"nope"}"#,
    )
    .expect("write garbage");

    let reopened = open_store(data_dir.path());

    assert_eq!(reopened.users(), original.users());
    assert_eq!(reopened.current_user().map(User::role), Some(Role::Admin));
    assert_ne!(reopened.current_user(), Some(&viewer));
}

#[rstest]
fn permission_checks_use_the_restored_acting_user(data_dir: TempDir) {
    let mut first = open_store(data_dir.path());
    let viewer = with_role(&first, Role::Viewer);
    first.set_current_user(viewer);

    let mut second = open_store(data_dir.path());
    let err = second
        .add(&UserCandidate::new("Mallory", "mallory@example.com", Role::Admin))
        .expect_err("restored viewer may not add");

    assert_eq!(err.code().as_str(), "forbidden");
    assert_eq!(second.users().len(), 3);
}

#[rstest]
fn removed_acting_admin_survives_a_restart(data_dir: TempDir) {
    let mut first = open_store(data_dir.path());
    let alice = with_role(&first, Role::Admin);
    assert!(first.remove(alice.id()).expect("admin may delete"));

    let mut second = open_store(data_dir.path());

    assert_eq!(second.snapshot(), first.snapshot());
    assert_eq!(second.current_user(), Some(&alice));
    second
        .add(&UserCandidate::new("Ada Lovelace", "ada@example.com", Role::Admin))
        .expect("restored admin may add");
}
