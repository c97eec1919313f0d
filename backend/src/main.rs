//! Admin console entry-point: loads settings, opens the persisted user store
//! and runs a single command against it.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use admin_console::config::ConsoleSettings;
use admin_console::domain::UserStore;
use admin_console::inbound::cli::{Cli, run};
use admin_console::outbound::persistence::{FileKeyValueStore, KeyValueUserStateRepository};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let settings = ConsoleSettings::load_from_iter([OsString::from("admin-console")])
        .map_err(|error| eyre!("failed to load console settings: {error}"))?;
    init_tracing(settings.json_logs);

    let data_dir = cli.data_dir.unwrap_or_else(|| settings.data_dir());
    let medium = FileKeyValueStore::open(data_dir).wrap_err("failed to open data directory")?;
    debug!(path = %medium.root().display(), "using data directory");

    let repository = Arc::new(KeyValueUserStateRepository::new(medium));
    let mut store = UserStore::open(repository, Arc::new(DefaultClock));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &mut store, &mut out)?;
    out.flush().wrap_err("failed to flush output")?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);
    let initialised = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = initialised {
        warn!(error = %e, "tracing init failed");
    }
}
