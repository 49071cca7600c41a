//! Project configuration for the CLI.
//!
//! Sources, lowest to highest priority:
//!
//! ```text
//! defaults < tsexplorer.config.json < TSEXPLORER_* env < CLI flags
//! ```

mod loading;
mod types;
mod validation;

pub use loading::{CONFIG_FILE_NAME, ENV_PREFIX, LoadedConfig, snake_to_camel};
pub use types::{CliOverrides, ProjectConfig};
