//! Console settings loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DATA_DIR: &str = ".admin-console";

/// Configuration for the admin console binary.
///
/// Values come from `ADMIN_CONSOLE_*` environment variables and the
/// OrthoConfig file layers; command-line flags are applied on top by the
/// binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN_CONSOLE")]
pub struct ConsoleSettings {
    /// Directory holding the persisted user state.
    pub data_dir: Option<PathBuf>,
    /// Emit logs as JSON lines instead of human-readable text.
    #[ortho_config(default = false)]
    pub json_logs: bool,
}

impl ConsoleSettings {
    /// Return the configured data directory, falling back to
    /// `./.admin-console`.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }
}
