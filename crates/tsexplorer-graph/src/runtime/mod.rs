//! Filesystem access for the graph builder.
//!
//! Workers, the resolver's `package.json` lookups and the snapshot sink all
//! go through [`Runtime`]. Tests substitute fixture and fault-injecting
//! implementations from `test_utils`.

pub mod native;

pub use native::NativeRuntime;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The path does not exist. Readers treat this as "skip", not failure.
    #[error("No such file: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O failure: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

/// The subset of `std::fs::Metadata` the builder looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: u64,
    pub is_dir: bool,
    pub is_file: bool,
}

/// Filesystem capability shared by every worker behind an `Arc<dyn Runtime>`.
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Write `content`, creating missing parent directories.
    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()>;

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    fn exists(&self, path: &Path) -> bool;

    /// Fallback project root when the caller gives none.
    fn current_dir(&self) -> RuntimeResult<PathBuf>;
}

/// Read a file as text, replacing invalid UTF-8 instead of failing.
pub async fn read_to_string(runtime: &dyn Runtime, path: &Path) -> RuntimeResult<String> {
    let bytes = runtime.read_file(path).await?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}
