//! Command-line adapter over the user store.
//!
//! Parsing is handled by clap; [`run`] executes one parsed [`Command`] against
//! a [`UserStore`] and writes plain text to any writer, so commands can be
//! exercised in tests without spawning a subprocess.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

use crate::domain::ports::UserStateRepository;
use crate::domain::{
    DEFAULT_PER_PAGE, PageRequest, Role, StoreError, User, UserCandidate, UserFilter, UserId,
    UserStore, UserValidationError,
};

/// `admin-console` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "admin-console",
    about = "Manage admin console user accounts with role-based permissions",
    version
)]
pub struct Cli {
    /// Directory holding persisted state. Overrides `ADMIN_CONSOLE_DATA_DIR`.
    #[arg(long = "data-dir", value_name = "path", global = true)]
    pub data_dir: Option<PathBuf>,
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Console operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List users, optionally filtered, one page at a time.
    List(ListArgs),
    /// Show account counts per role.
    Summary,
    /// Show the acting user.
    Whoami,
    /// Act as another user from now on.
    Use {
        /// Identifier of the user to act as.
        #[arg(value_name = "id", value_parser = parse_user_id)]
        id: UserId,
    },
    /// Create a user.
    Add(AddArgs),
    /// Change fields of an existing user.
    Update(UpdateArgs),
    /// Delete a user.
    Remove {
        /// Identifier of the user to delete.
        #[arg(value_name = "id", value_parser = parse_user_id)]
        id: UserId,
    },
}

/// Arguments for `list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against names and emails.
    #[arg(long, value_name = "text")]
    pub search: Option<String>,
    /// Only show users with this role.
    #[arg(long, value_name = "role")]
    pub role: Option<Role>,
    /// Page to show, starting at 1.
    #[arg(long, value_name = "n", default_value_t = 1)]
    pub page: usize,
    /// Users per page.
    #[arg(long = "per-page", value_name = "n", default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: usize,
}

/// Arguments for `add`.
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Account holder's name.
    #[arg(long, value_name = "name")]
    pub name: String,
    /// Contact email.
    #[arg(long, value_name = "email")]
    pub email: String,
    /// Role to grant.
    #[arg(long, value_name = "role")]
    pub role: Role,
}

/// Arguments for `update`; omitted fields keep their values.
#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Identifier of the user to change.
    #[arg(value_name = "id", value_parser = parse_user_id)]
    pub id: UserId,
    /// New name.
    #[arg(long, value_name = "name")]
    pub name: Option<String>,
    /// New email.
    #[arg(long, value_name = "email")]
    pub email: Option<String>,
    /// New role.
    #[arg(long, value_name = "role")]
    pub role: Option<Role>,
}

/// Failures surfaced by console commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No user has the requested identifier.
    #[error("no user with id {id}")]
    UnknownUser {
        /// Identifier that matched nothing.
        id: UserId,
    },
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn parse_user_id(raw: &str) -> Result<UserId, UserValidationError> {
    UserId::new(raw)
}

/// Execute `command` against `store`, writing the result to `out`.
///
/// # Errors
///
/// Returns [`CliError::Store`] when the store refuses a mutation,
/// [`CliError::UnknownUser`] when `use` names a missing user, and
/// [`CliError::Output`] when `out` cannot be written.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use admin_console::domain::UserStore;
/// use admin_console::domain::ports::FixtureUserStateRepository;
/// use admin_console::inbound::cli::{Command, run};
/// use mockable::DefaultClock;
///
/// let mut store = UserStore::open(Arc::new(FixtureUserStateRepository), Arc::new(DefaultClock));
/// let mut out = Vec::new();
/// run(Command::Summary, &mut store, &mut out).expect("summary always succeeds");
/// assert!(String::from_utf8_lossy(&out).starts_with("total: 3"));
/// ```
pub fn run<R, W>(command: Command, store: &mut UserStore<R>, out: &mut W) -> Result<(), CliError>
where
    R: UserStateRepository,
    W: Write,
{
    debug!(?command, "running console command");
    match command {
        Command::List(args) => list(store, args, out),
        Command::Summary => summary(store, out),
        Command::Whoami => whoami(store, out),
        Command::Use { id } => switch_user(store, id, out),
        Command::Add(args) => add(store, args, out),
        Command::Update(args) => update(store, args, out),
        Command::Remove { id } => remove(store, id, out),
    }
}

fn list<R, W: Write>(store: &UserStore<R>, args: ListArgs, out: &mut W) -> Result<(), CliError> {
    let ListArgs {
        search,
        role,
        page,
        per_page,
    } = args;
    let filter = UserFilter { search, role };
    let results = store.query(&filter, PageRequest::new(page, per_page));

    if results.items.is_empty() {
        writeln!(out, "no users found")?;
        return Ok(());
    }
    for user in &results.items {
        write_user(out, user)?;
    }
    writeln!(
        out,
        "page {} of {} ({} users)",
        results.page, results.total_pages, results.total_items
    )?;
    Ok(())
}

fn summary<R, W: Write>(store: &UserStore<R>, out: &mut W) -> Result<(), CliError> {
    let summary = store.summary();
    writeln!(out, "total: {}", summary.total)?;
    for role in Role::ALL {
        writeln!(
            out,
            "{}: {}",
            role.as_str().to_lowercase(),
            summary.count(role)
        )?;
    }
    Ok(())
}

fn whoami<R, W: Write>(store: &UserStore<R>, out: &mut W) -> Result<(), CliError> {
    match store.current_user() {
        Some(user) => write_user(out, user)?,
        None => writeln!(out, "no acting user selected")?,
    }
    Ok(())
}

fn switch_user<R, W>(store: &mut UserStore<R>, id: UserId, out: &mut W) -> Result<(), CliError>
where
    R: UserStateRepository,
    W: Write,
{
    let user = store.find(&id).cloned().ok_or(CliError::UnknownUser { id })?;
    writeln!(out, "now acting as {} ({})", user.name(), user.role())?;
    store.set_current_user(user);
    report_storage_warning(store, out)
}

fn add<R, W>(store: &mut UserStore<R>, args: AddArgs, out: &mut W) -> Result<(), CliError>
where
    R: UserStateRepository,
    W: Write,
{
    let AddArgs { name, email, role } = args;
    let user = store.add(&UserCandidate::new(name, email, role))?;
    write!(out, "added ")?;
    write_user(out, &user)?;
    report_storage_warning(store, out)
}

fn update<R, W>(store: &mut UserStore<R>, args: UpdateArgs, out: &mut W) -> Result<(), CliError>
where
    R: UserStateRepository,
    W: Write,
{
    let UpdateArgs {
        id,
        name,
        email,
        role,
    } = args;
    let user = store.update(&id, &UserCandidate { name, email, role })?;
    write!(out, "updated ")?;
    write_user(out, &user)?;
    report_storage_warning(store, out)
}

fn remove<R, W>(store: &mut UserStore<R>, id: UserId, out: &mut W) -> Result<(), CliError>
where
    R: UserStateRepository,
    W: Write,
{
    if store.remove(&id)? {
        writeln!(out, "removed {id}")?;
    } else {
        writeln!(out, "no user with id {id}; nothing removed")?;
    }
    report_storage_warning(store, out)
}

fn write_user<W: Write>(out: &mut W, user: &User) -> io::Result<()> {
    writeln!(
        out,
        "{}  {:<20}  {:<28}  {}",
        user.id(),
        user.name().as_ref(),
        user.email().as_ref(),
        user.role()
    )
}

fn report_storage_warning<R, W: Write>(store: &UserStore<R>, out: &mut W) -> Result<(), CliError> {
    if let Some(failure) = store.error() {
        writeln!(out, "warning: change kept in memory only: {failure}")?;
    }
    Ok(())
}
