//! Application configuration
//!
//! Central location for the default values applied to new rows, the
//! validation boundaries used by the API handlers, and the runtime
//! settings loaded at startup.

use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;

// ===== Seed Data =====

/// Name given to the project and board created on first boot
pub const DEFAULT_SEED_NAME: &str = "Default";

// ===== Project Limits =====

/// Exact number of digits in a project PIN
pub const PIN_LENGTH: usize = 4;

// ===== Board Defaults =====

/// Name used when a board is created without one
pub const DEFAULT_BOARD_NAME: &str = "Untitled";

/// Suffix appended to the name of a duplicated board
pub const BOARD_COPY_SUFFIX: &str = " (copy)";

pub const DEFAULT_BOARD_BACKGROUND: &str = "#FFFFFF";

// ===== Note Defaults =====

/// Default note position and size in pixels
pub const DEFAULT_NOTE_X: f64 = 50.0;
pub const DEFAULT_NOTE_Y: f64 = 50.0;
pub const DEFAULT_NOTE_WIDTH: f64 = 200.0;
pub const DEFAULT_NOTE_HEIGHT: f64 = 150.0;

/// Pale yellow, the classic sticky note
pub const DEFAULT_NOTE_COLOR: &str = "#FFF59D";
pub const DEFAULT_NOTE_Z_INDEX: i64 = 1;
pub const DEFAULT_NOTE_FONT: &str = "Arial";
pub const DEFAULT_NOTE_FONT_COLOR: &str = "#000000";
pub const DEFAULT_NOTE_FONT_SIZE: i64 = 14;

/// Note id the client sends for scroll placeholders; updates to it are ignored
pub const PLACEHOLDER_NOTE_ID: i64 = 0;

// ===== Runtime Settings =====

const ENV_PREFIX: &str = "STICKYBOARD";
const CONFIG_FILE: &str = "stickyboard";

/// Runtime settings for the server process
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// SQLite database file, created on first boot
    pub database_path: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Load settings from defaults, an optional `stickyboard.toml`,
    /// then `STICKYBOARD_*` environment variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default(
                "database_path",
                defaults.database_path.to_string_lossy().into_owned(),
            )?
            .set_default(
                "static_dir",
                defaults.static_dir.to_string_lossy().into_owned(),
            )?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:1906".to_string(),
            database_path: PathBuf::from("stickyboard.db"),
            static_dir: PathBuf::from("static"),
        }
    }
}
