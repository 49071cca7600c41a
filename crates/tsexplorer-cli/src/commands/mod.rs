//! Command implementations.

mod check;
mod parse;

pub use check::execute as check_execute;
pub use parse::execute as parse_execute;

use crate::error::{CliError, Result};
use std::path::PathBuf;

/// The process working directory.
pub(crate) fn current_dir() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| CliError::Custom(format!("Cannot determine working directory: {}", e)))
}
