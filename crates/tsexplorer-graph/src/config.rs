//! Builder and resolver configuration.

use std::path::PathBuf;

/// Per-file parsing switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Extract and hash syntax nodes for every file.
    pub resolve_file_nodes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            resolve_file_nodes: true,
        }
    }
}

/// Module resolution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Project root. Relative entries and the default tsconfig are looked up here.
    pub root: PathBuf,
    /// Explicit tsconfig. When `None`, `<root>/tsconfig.json` is used if present.
    pub tsconfig: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub condition_names: Vec<String>,
    pub main_fields: Vec<String>,
}

impl ResolutionConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            tsconfig: None,
            extensions: [
                ".ts", ".tsx", ".d.ts", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs", ".json",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            condition_names: ["types", "import", "require", "node", "default"]
                .into_iter()
                .map(String::from)
                .collect(),
            main_fields: ["types", "typings", "module", "main"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Everything a `GraphBuilder` run needs besides the runtime.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub entries: Vec<PathBuf>,
    pub resolution: ResolutionConfig,
    pub parse: ParseOptions,
    /// Follow imports past the entry files.
    pub resolve_imported_modules: bool,
    /// Record packages for `node_modules` imports but do not parse their files.
    pub skip_node_modules: bool,
    /// Worker count. `None` means available parallelism minus one.
    pub pool_size: Option<usize>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            resolution: ResolutionConfig::default(),
            parse: ParseOptions::default(),
            resolve_imported_modules: true,
            skip_node_modules: true,
            pool_size: None,
        }
    }
}

impl BuilderConfig {
    /// Worker count for this run, never less than one.
    pub fn effective_pool_size(&self) -> usize {
        match self.pool_size {
            Some(size) => size.max(1),
            None => default_pool_size(),
        }
    }
}

/// Available parallelism minus one for the coordinator, at least one.
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}
