//! `Runtime` over the real filesystem.
//!
//! Every call that may block on the OS is moved onto tokio's blocking pool
//! so coordinator and worker tasks keep making progress during disk I/O.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::task;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

fn map_io(err: io::Error, path: &Path, action: &str) -> RuntimeError {
    match err.kind() {
        io::ErrorKind::NotFound => RuntimeError::FileNotFound(path.to_path_buf()),
        _ => RuntimeError::Io(format!("cannot {action} {}: {err}", path.display())),
    }
}

async fn blocking<T, F>(op: F) -> RuntimeResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> RuntimeResult<T> + Send + 'static,
{
    task::spawn_blocking(op)
        .await
        .map_err(|e| RuntimeError::Other(format!("blocking task failed: {e}")))?
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let owned = path.to_path_buf();
        blocking(move || std::fs::read(&owned).map_err(|e| map_io(e, &owned, "read"))).await
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        let owned = path.to_path_buf();
        let bytes = content.to_vec();
        blocking(move || {
            match owned.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => {
                    std::fs::create_dir_all(dir).map_err(|e| map_io(e, dir, "create"))?
                }
                _ => {}
            }
            std::fs::write(&owned, bytes).map_err(|e| map_io(e, &owned, "write"))
        })
        .await
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let owned = path.to_path_buf();
        blocking(move || {
            let meta = std::fs::metadata(&owned).map_err(|e| map_io(e, &owned, "stat"))?;
            Ok(FileMetadata {
                size: meta.len(),
                is_dir: meta.is_dir(),
                is_file: meta.is_file(),
            })
        })
        .await
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn current_dir(&self) -> RuntimeResult<PathBuf> {
        std::env::current_dir()
            .map_err(|e| RuntimeError::Io(format!("cannot read working directory: {e}")))
    }
}
