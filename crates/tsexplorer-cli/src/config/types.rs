use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Contents of `tsexplorer.config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Human-readable name recorded in snapshots
    pub project_name: Option<String>,
    /// Identifier handed to the graph sink
    pub project_id: Option<String>,
    /// Root directory; relative to the config file when set there
    pub project_root: PathBuf,
    /// Entry files, relative to `project_root`
    pub entry_points: Vec<PathBuf>,
    /// tsconfig for path aliases, relative to `project_root`
    pub tsconfig: Option<PathBuf>,
    pub resolve_file_nodes: bool,
    pub resolve_imported_modules: bool,
    pub skip_node_modules: bool,
    /// Worker count; unset means available cores minus one
    pub jobs: Option<usize>,
    /// JSON snapshot destination
    pub output: Option<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_name: None,
            project_id: None,
            project_root: PathBuf::from("."),
            entry_points: Vec::new(),
            tsconfig: None,
            resolve_file_nodes: true,
            resolve_imported_modules: true,
            skip_node_modules: true,
            jobs: None,
            output: None,
        }
    }
}

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_points: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsconfig: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_file_nodes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_imported_modules: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_node_modules: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}
