//! Handing a finished graph to a persistence collaborator.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::hash::FileHash;
use crate::maps::{GraphStatistics, ParserMaps};
use crate::runtime::Runtime;
use crate::types::{FileEntry, NodePackage, SourceNode};
use crate::{Error, Result};

/// Receives the maps of a completed run.
#[async_trait]
pub trait GraphSink: Send + Sync {
    async fn persist(&self, project_id: &str, maps: &ParserMaps) -> Result<()>;
}

/// Deterministic, serializable view of a `ParserMaps`.
///
/// Every collection is sorted by key so two equal graphs serialize to the
/// same bytes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot<'m> {
    pub project_id: &'m str,
    pub project_name: Option<&'m str>,
    pub statistics: GraphStatistics,
    pub files: BTreeMap<&'m FileHash, &'m FileEntry>,
    /// Per-file node lists in pre-order.
    pub file_nodes: BTreeMap<&'m FileHash, &'m [SourceNode]>,
    pub imports: BTreeMap<&'m FileHash, Vec<&'m FileHash>>,
    pub packages: BTreeMap<&'m str, &'m NodePackage>,
    pub file_packages: BTreeMap<&'m FileHash, Vec<&'m str>>,
}

impl<'m> GraphSnapshot<'m> {
    pub fn new(project_id: &'m str, project_name: Option<&'m str>, maps: &'m ParserMaps) -> Self {
        let imports = maps
            .imports
            .iter()
            .map(|(from, targets)| {
                let mut targets: Vec<_> = targets.iter().collect();
                targets.sort();
                (from, targets)
            })
            .collect();

        let file_packages = maps
            .file_packages
            .iter()
            .map(|(file, names)| {
                let mut names: Vec<_> = names.iter().map(String::as_str).collect();
                names.sort_unstable();
                (file, names)
            })
            .collect();

        Self {
            project_id,
            project_name,
            statistics: maps.statistics(),
            files: maps.files.iter().collect(),
            file_nodes: maps
                .file_nodes
                .iter()
                .map(|(file, nodes)| (file, nodes.as_slice()))
                .collect(),
            imports,
            packages: maps
                .packages
                .iter()
                .map(|(name, package)| (name.as_str(), package))
                .collect(),
            file_packages,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Operation(format!("Failed to serialize graph: {e}")))
    }
}

/// Writes the graph as a JSON document through a `Runtime`.
#[derive(Debug)]
pub struct JsonSnapshotSink {
    runtime: Arc<dyn Runtime>,
    output: PathBuf,
    project_name: Option<String>,
}

impl JsonSnapshotSink {
    pub fn new(runtime: Arc<dyn Runtime>, output: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            output: output.into(),
            project_name: None,
        }
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[async_trait]
impl GraphSink for JsonSnapshotSink {
    async fn persist(&self, project_id: &str, maps: &ParserMaps) -> Result<()> {
        let json =
            GraphSnapshot::new(project_id, self.project_name.as_deref(), maps).to_json()?;
        self.runtime
            .write_file(&self.output, json.as_bytes())
            .await?;
        tracing::info!("Wrote graph snapshot to {}", self.output.display());
        Ok(())
    }
}
