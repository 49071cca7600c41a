//! # tsexplorer-graph
//!
//! Content-addressed dependency graphs for TypeScript and JavaScript projects.
//!
//! Starting from a set of entry files, the builder discovers every file
//! reachable through static imports, flattens each file's syntax tree into
//! hash-identified nodes, and records which external packages each file uses.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────┐
//!   entries ─────▶ │        GraphBuilder          │
//!                  │  (coordinator, single writer)│
//!                  └──────┬───────────────▲───────┘
//!              JobRequest │               │ WorkerResponse
//!                         ▼               │
//!                  ┌──────────────────────┴───────┐
//!                  │     worker pool (N tasks)    │
//!                  │  ModuleResolver  FileParser  │
//!                  │                  NodeWalker  │
//!                  └──────────────────────────────┘
//!                                 │
//!                                 ▼
//!                            ParserMaps ───▶ GraphSink
//! ```
//!
//! ## Identity
//!
//! - Files: `sha256(path ":" content)`; the same content at two paths gives
//!   two files.
//! - Nodes: `sha256(kind ":" text ":" start ":" end)`.
//! - Packages: normalized name; `@types/foo` and `foo` are one package.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tsexplorer_graph::GraphBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let maps = GraphBuilder::new()
//!     .root("./my-app")
//!     .entry("src/main.ts")
//!     .build()
//!     .await?;
//!
//! let stats = maps.statistics();
//! println!("{} files, {} packages", stats.files, stats.packages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Model
//!
//! Missing files and unresolvable specifiers are skipped. A job that errors
//! or panics is logged and contributes nothing. Only an empty set of readable
//! entry files fails the build.

pub mod builder;
pub mod config;
pub mod export;
pub mod hash;
pub mod maps;
pub mod package_json;
pub mod parser;
pub mod resolver;
pub mod runtime;
pub mod types;

pub use builder::{BuildError, GraphBuilder};
pub use config::{BuilderConfig, ParseOptions, ResolutionConfig, default_pool_size};
pub use export::{GraphSink, GraphSnapshot, JsonSnapshotSink};
pub use hash::{ContentHash, FileHash, NodeHash, hash_file, hash_node};
pub use maps::{GraphStatistics, ParserMaps};
pub use parser::{FileContent, FileParser, ParseError};
pub use resolver::ModuleResolver;
pub use runtime::{FileMetadata, NativeRuntime, Runtime, RuntimeError, RuntimeResult};
pub use types::{FileEntry, NodePackage, ResolvedModule, SourceFile, SourceNode};

#[cfg(any(test, feature = "test-utils"))]
pub use runtime::test_utils::{TestRuntime, create_test_project};

/// Error type for library operations outside the build itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration or input file
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Generic operation error
    #[error("Operation failed: {0}")]
    Operation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
