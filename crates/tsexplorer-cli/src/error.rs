//! CLI errors and their presentation.
//!
//! Commands return [`CliError`]. Graph and configuration failures convert
//! into it with `?`, and `main` renders the result through miette. Variants
//! the user can act on end with a `Hint:` paragraph.

use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;
use tsexplorer_graph::BuildError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    /// Snapshot export and other library operations
    #[error("{0}")]
    Graph(#[from] tsexplorer_graph::Error),

    #[error("{0}")]
    Custom(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `--config` path that does not exist
    #[error("Config file not found: {}\n\nHint: Create tsexplorer.config.json or pass a valid --config <path>", .0.display())]
    NotFound(PathBuf),

    #[error("'{field}' is required\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    #[error("'{field}' has an invalid value ({value})\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Attach user-facing text to any error that converts into `CliError`.
pub trait ResultExt<T> {
    fn with_hint(self, hint: impl Display) -> Result<T>;

    fn context(self, prefix: impl Display) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_hint(self, hint: impl Display) -> Result<T> {
        self.map_err(|e| CliError::Custom(format!("{}\n\nHint: {hint}", e.into())))
    }

    fn context(self, prefix: impl Display) -> Result<T> {
        self.map_err(|e| CliError::Custom(format!("{prefix}: {}", e.into())))
    }
}

/// Render a command failure for the terminal.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Build(BuildError::NoEntryFiles { requested }) => miette::miette!(
            "None of the {} configured entry point(s) could be read\n\nHint: Entry points are resolved against the project root; run 'tsexplorer check' to see which are missing",
            requested
        ),
        other => miette::miette!("{}", other),
    }
}
