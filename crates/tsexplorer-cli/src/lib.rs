//! tsexplorer CLI - index TypeScript projects into content-addressed graphs.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`config`] - layered configuration (file, environment, flags)
//! - [`error`] - error types with actionable hints
//! - [`logger`] - tracing subscriber setup
//! - `commands` - command implementations

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;

pub use error::{CliError, ConfigError, Result, ResultExt};
