//! Reading and parsing a single source file.
//!
//! Parsing is split in two steps so workers can skip syntax work for files
//! the coordinator already knows about:
//!
//! ```text
//! read()  ──▶ FileContent { path, content, hash }   (I/O, cheap)
//!                    │
//!                    ▼  hash already known? stop here
//! parse() ──▶ SourceFile { specifiers, nodes, .. }  (CPU, blocking pool)
//! ```

pub mod imports;
pub mod walker;

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ParseOptions;
use crate::hash::{FileHash, hash_file};
use crate::runtime::{self, Runtime, RuntimeError};
use crate::types::SourceFile;

pub use imports::ImportCollector;
pub use walker::NodeWalker;

/// Errors from reading or parsing one file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("Parser task for {path} failed: {reason}")]
    Task { path: PathBuf, reason: String },
}

/// Raw file contents plus their identity, before any syntax work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: PathBuf,
    pub content: String,
    pub hash: FileHash,
}

/// Reads files through a `Runtime` and turns them into `SourceFile`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileParser {
    options: ParseOptions,
}

impl FileParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Read and hash a file.
    ///
    /// Returns `Ok(None)` when the file does not exist or is empty.
    pub async fn read(
        &self,
        path: &Path,
        runtime: &dyn Runtime,
    ) -> Result<Option<FileContent>, ParseError> {
        if !runtime.exists(path) {
            return Ok(None);
        }

        let content = match runtime::read_to_string(runtime, path).await {
            Ok(content) => content,
            Err(RuntimeError::FileNotFound(_)) => return Ok(None),
            Err(source) => {
                return Err(ParseError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if content.is_empty() {
            return Ok(None);
        }

        let hash = hash_file(path, &content);
        Ok(Some(FileContent {
            path: path.to_path_buf(),
            content,
            hash,
        }))
    }

    /// Parse already-read contents. Runs on the calling thread.
    pub fn parse(&self, file: FileContent, is_entrypoint: bool) -> SourceFile {
        parse_source(file, is_entrypoint, self.options)
    }

    /// Parse on tokio's blocking pool.
    pub async fn parse_blocking(
        &self,
        file: FileContent,
        is_entrypoint: bool,
    ) -> Result<SourceFile, ParseError> {
        let options = self.options;
        let path = file.path.clone();

        tokio::task::spawn_blocking(move || parse_source(file, is_entrypoint, options))
            .await
            .map_err(|e| ParseError::Task {
                path,
                reason: e.to_string(),
            })
    }

    /// Read and parse a file in one step.
    pub async fn parse_file(
        &self,
        path: &Path,
        is_entrypoint: bool,
        runtime: &dyn Runtime,
    ) -> Result<Option<SourceFile>, ParseError> {
        match self.read(path, runtime).await? {
            Some(file) => self.parse_blocking(file, is_entrypoint).await.map(Some),
            None => Ok(None),
        }
    }
}

fn source_type_for(path: &Path) -> Option<SourceType> {
    let source_type = SourceType::from_path(path).ok()?;
    if source_type.is_typescript() {
        Some(source_type)
    } else {
        Some(source_type.with_jsx(true))
    }
}

fn parse_source(file: FileContent, is_entrypoint: bool, options: ParseOptions) -> SourceFile {
    let FileContent {
        path,
        content,
        hash,
    } = file;

    // JSON and other assets are recorded without syntax
    let Some(source_type) = source_type_for(&path) else {
        return SourceFile {
            path,
            hash,
            is_entrypoint,
            import_specifiers: Vec::new(),
            content,
            nodes: Vec::new(),
        };
    };

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &content, source_type).parse();
    if !ret.errors.is_empty() {
        debug!(
            "{} syntax error(s) in {}, using recovered tree",
            ret.errors.len(),
            path.display()
        );
    }

    let import_specifiers = ImportCollector::collect(&ret.program);
    let nodes = if options.resolve_file_nodes {
        NodeWalker::flatten(&ret.program, &content)
    } else {
        Vec::new()
    };

    SourceFile {
        path,
        hash,
        is_entrypoint,
        import_specifiers,
        content,
        nodes,
    }
}
