use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::{ParseArgs, ProjectArgs};
use crate::config::types::{CliOverrides, ProjectConfig};
use crate::error::{ConfigError, Result};

pub const CONFIG_FILE_NAME: &str = "tsexplorer.config.json";
pub const ENV_PREFIX: &str = "TSEXPLORER_";

/// A merged configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ProjectConfig,
    /// The config file that was read, if any
    pub config_file: Option<PathBuf>,
    /// Absolute project root
    pub root: PathBuf,
}

impl CliOverrides {
    /// Overrides common to every command.
    pub fn from_project_args(args: &ProjectArgs) -> Self {
        Self {
            project_root: args.root.clone(),
            entry_points: (!args.entries.is_empty()).then(|| args.entries.clone()),
            tsconfig: args.tsconfig.clone(),
            ..Self::default()
        }
    }

    /// Overrides for `tsexplorer parse`. Boolean flags only ever switch
    /// behavior away from the default, so an absent flag sets nothing.
    pub fn from_parse_args(args: &ParseArgs) -> Self {
        Self {
            project_id: args.project_id.clone(),
            resolve_file_nodes: args.no_nodes.then_some(false),
            resolve_imported_modules: args.no_follow.then_some(false),
            skip_node_modules: args.include_node_modules.then_some(false),
            jobs: args.jobs,
            output: args.output.clone(),
            ..Self::from_project_args(&args.project)
        }
    }
}

/// Map an environment key such as `skip_node_modules` to `skipNodeModules`.
pub fn snake_to_camel(key: &str) -> String {
    let mut camel = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = !camel.is_empty();
        } else if upper_next {
            camel.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            camel.extend(ch.to_lowercase());
        }
    }
    camel
}

impl ProjectConfig {
    /// The layered provider stack, without extracting.
    pub fn figment(config_file: Option<&Path>, overrides: &CliOverrides) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(ProjectConfig::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Json::file(path));
        }

        // TSEXPLORER_SKIP_NODE_MODULES=false, TSEXPLORER_JOBS=4, ...
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX).map(|key| snake_to_camel(key.as_str()).into()),
        );

        figment.merge(Serialized::defaults(overrides))
    }

    /// Load configuration from every source.
    ///
    /// `cwd` anchors relative CLI paths and the default config file lookup.
    pub fn load(args: &ProjectArgs, overrides: &CliOverrides, cwd: &Path) -> Result<LoadedConfig> {
        let config_file = match &args.config {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = cwd.join(CONFIG_FILE_NAME);
                default_path.is_file().then_some(default_path)
            }
        };

        if let Some(path) = &config_file {
            debug!("Loading config from {}", path.display());
        }

        let config: ProjectConfig = Self::figment(config_file.as_deref(), overrides)
            .extract()
            .map_err(|e| ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: format!("Check {} syntax and field types", CONFIG_FILE_NAME),
            })?;

        // A root from the command line is relative to the working directory,
        // one from the config file is relative to that file
        let base = match (&overrides.project_root, &config_file) {
            (None, Some(file)) => file.parent().unwrap_or(cwd).to_path_buf(),
            _ => cwd.to_path_buf(),
        };
        let root = tsexplorer_graph::builder::normalize_path(&base, &config.project_root);

        Ok(LoadedConfig {
            config,
            config_file,
            root,
        })
    }
}
