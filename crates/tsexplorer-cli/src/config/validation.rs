use crate::config::LoadedConfig;
use crate::error::{ConfigError, Result};

impl LoadedConfig {
    /// Validate the merged configuration against the filesystem.
    pub fn validate(&self) -> Result<()> {
        let config = &self.config;

        if config.entry_points.is_empty() {
            return Err(ConfigError::MissingField {
                field: "entryPoints".to_string(),
                hint: "Add \"entryPoints\" to tsexplorer.config.json or pass --entry <file>"
                    .to_string(),
            }
            .into());
        }

        if !self.root.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "projectRoot".to_string(),
                value: self.root.display().to_string(),
                hint: "The project root must be an existing directory".to_string(),
            }
            .into());
        }

        if config.jobs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "jobs".to_string(),
                value: "0".to_string(),
                hint: "Use at least one worker, or leave unset for the default".to_string(),
            }
            .into());
        }

        if let Some(tsconfig) = &config.tsconfig {
            let path = self.root.join(tsconfig);
            if !path.is_file() {
                return Err(ConfigError::InvalidValue {
                    field: "tsconfig".to_string(),
                    value: path.display().to_string(),
                    hint: "Point tsconfig at an existing file, relative to the project root"
                        .to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Identifier for the graph sink: projectId, then projectName, then the
    /// root directory name.
    pub fn project_id(&self) -> String {
        self.config
            .project_id
            .clone()
            .or_else(|| self.config.project_name.clone())
            .or_else(|| {
                self.root
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "project".to_string())
    }
}
