//! Concurrent project graph construction.
//!
//! `GraphBuilder` parses the entry files, then hands the discovered files to
//! a fixed pool of workers. Each job resolves one file's imports and parses
//! the imported files nobody has seen yet; the coordinator merges the results
//! and queues the new files. The run ends when nothing is pending or active.

mod job;
mod scheduler;
mod worker;

#[cfg(test)]
mod tests;

use path_clean::PathClean;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{BuilderConfig, ParseOptions, ResolutionConfig};
use crate::maps::ParserMaps;
use crate::parser::FileParser;
use crate::resolver::ModuleResolver;
use crate::runtime::{NativeRuntime, Runtime, RuntimeError};

use job::JobFile;
use scheduler::Scheduler;
use worker::WorkerContext;

/// Errors that abort a build.
///
/// Per-file problems never show up here; they are logged and the file's
/// contribution is dropped.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// None of the configured entry files could be read.
    #[error("No entry files could be resolved ({requested} configured)")]
    NoEntryFiles { requested: usize },

    #[error("Could not determine project root: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Worker pool failed: {0}")]
    WorkerPool(String),
}

/// Builds a `ParserMaps` for a project.
///
/// # Example
///
/// ```rust,no_run
/// use tsexplorer_graph::GraphBuilder;
///
/// # async fn example() -> Result<(), tsexplorer_graph::BuildError> {
/// let maps = GraphBuilder::new()
///     .root("/path/to/project")
///     .entry("src/index.ts")
///     .skip_node_modules(true)
///     .build()
///     .await?;
///
/// println!("{} files", maps.files.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    config: BuilderConfig,
    root: Option<PathBuf>,
    runtime: Option<Arc<dyn Runtime>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            config: BuilderConfig::default(),
            root: None,
            runtime: None,
        }
    }

    /// Start from a complete configuration. Its resolution root is used.
    pub fn from_config(config: BuilderConfig) -> Self {
        let root = Some(config.resolution.root.clone());
        Self {
            config,
            root,
            runtime: None,
        }
    }

    /// Add a single entry point. Relative paths are joined to the root.
    pub fn entry(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.entries.push(path.into());
        self
    }

    /// Add multiple entry points.
    pub fn entries(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.config
            .entries
            .extend(paths.into_iter().map(|p| p.into()));
        self
    }

    /// Project root. Defaults to the runtime's working directory.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn tsconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.resolution.tsconfig = Some(path.into());
        self
    }

    /// Extract syntax nodes for every file (default: true).
    pub fn resolve_file_nodes(mut self, enabled: bool) -> Self {
        self.config.parse.resolve_file_nodes = enabled;
        self
    }

    /// Follow imports past the entry files (default: true).
    pub fn resolve_imported_modules(mut self, enabled: bool) -> Self {
        self.config.resolve_imported_modules = enabled;
        self
    }

    /// Record packages but do not parse `node_modules` files (default: true).
    pub fn skip_node_modules(mut self, enabled: bool) -> Self {
        self.config.skip_node_modules = enabled;
        self
    }

    /// Number of workers. Values below one are raised to one.
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = Some(size);
        self
    }

    /// Set the runtime for filesystem operations (default: `NativeRuntime`).
    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Run the build.
    pub async fn build(self) -> Result<ParserMaps, BuildError> {
        let started = Instant::now();
        let runtime = self
            .runtime
            .unwrap_or_else(|| Arc::new(NativeRuntime::new()) as Arc<dyn Runtime>);

        let root = match self.root {
            Some(root) if root.is_absolute() => root.clean(),
            Some(root) => runtime.current_dir()?.join(root).clean(),
            None => runtime.current_dir()?.clean(),
        };

        let mut config = self.config;
        config.resolution.root = root.clone();
        if let Some(tsconfig) = config.resolution.tsconfig.take() {
            config.resolution.tsconfig = Some(normalize_path(&root, &tsconfig));
        }

        let pool_size = config.effective_pool_size();
        info!(
            "Indexing {} entry file(s) under {} with {} worker(s)",
            config.entries.len(),
            root.display(),
            pool_size
        );

        let parser = FileParser::new(config.parse);
        let mut maps = ParserMaps::new();
        let seeds = parse_entries(&config, &root, &parser, runtime.as_ref(), &mut maps).await;

        if seeds.is_empty() {
            return Err(BuildError::NoEntryFiles {
                requested: config.entries.len(),
            });
        }

        if !config.resolve_imported_modules {
            debug!("Import resolution disabled; graph holds entry files only");
            log_summary(&maps, started);
            return Ok(maps);
        }

        let context = Arc::new(WorkerContext {
            resolver: ModuleResolver::new(&config.resolution, runtime.as_ref()),
            runtime,
            parser,
            skip_node_modules: config.skip_node_modules,
        });

        let mut scheduler = Scheduler::spawn(context, pool_size, maps);
        for seed in seeds {
            scheduler.enqueue(seed);
        }
        let maps = scheduler.run().await?;

        log_summary(&maps, started);
        Ok(maps)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute, lexically cleaned form of `path` relative to `root`.
pub fn normalize_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.clean()
    } else {
        root.join(path).clean()
    }
}

/// Parse entry files on the coordinator and seed the maps with them.
async fn parse_entries(
    config: &BuilderConfig,
    root: &Path,
    parser: &FileParser,
    runtime: &dyn Runtime,
    maps: &mut ParserMaps,
) -> Vec<JobFile> {
    let mut seen_paths = FxHashSet::default();
    let mut seeds = Vec::new();

    for entry in &config.entries {
        let path = normalize_path(root, entry);
        if !seen_paths.insert(path.clone()) {
            continue;
        }

        match parser.parse_file(&path, true, runtime).await {
            Ok(Some(file)) => {
                let (entry, nodes) = file.into_parts();
                let seed = JobFile::from(&entry);
                if maps.declare_file(entry, nodes) {
                    seeds.push(seed);
                }
            }
            Ok(None) => warn!("Entry file not found or empty: {}", path.display()),
            Err(err) => warn!("Skipping entry {}: {}", path.display(), err),
        }
    }

    seeds
}

fn log_summary(maps: &ParserMaps, started: Instant) {
    let stats = maps.statistics();
    info!(
        "Indexed {} file(s), {} node(s), {} import edge(s), {} package(s) in {:.2?}",
        stats.files,
        stats.nodes,
        stats.import_edges,
        stats.packages,
        started.elapsed()
    );
}
