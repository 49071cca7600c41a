//! Fixtures for tests.
//!
//! `oxc_resolver` reads the disk on its own, so fixtures are real files in a
//! `TempDir` and the runtimes here read those same files synchronously.
//!
//! - `TestRuntime`: plain `std::fs`, with a fixed working directory
//! - `FaultyRuntime`: fails or panics when reading one chosen file name
//! - `create_test_project`: writes `(relative path, contents)` pairs

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Synchronous `std::fs` runtime rooted at a fixture directory.
#[derive(Debug, Clone)]
pub struct TestRuntime {
    root: PathBuf,
}

impl TestRuntime {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

fn fixture_error(err: io::Error, path: &Path) -> RuntimeError {
    match err.kind() {
        io::ErrorKind::NotFound => RuntimeError::FileNotFound(path.to_path_buf()),
        _ => RuntimeError::Io(format!("{}: {err}", path.display())),
    }
}

#[async_trait]
impl Runtime for TestRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| fixture_error(e, path))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        let dir = path.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(dir).map_err(|e| fixture_error(e, dir))?;
        std::fs::write(path, content).map_err(|e| fixture_error(e, path))
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        std::fs::metadata(path)
            .map(|meta| FileMetadata {
                size: meta.len(),
                is_dir: meta.is_dir(),
                is_file: meta.is_file(),
            })
            .map_err(|e| fixture_error(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn current_dir(&self) -> RuntimeResult<PathBuf> {
        Ok(self.root.clone())
    }
}

/// How a `FaultyRuntime` misbehaves when it reads a poisoned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Return `RuntimeError::Io`
    Error,
    /// Panic inside `read_file`
    Panic,
}

/// Runtime that fails reads of files with a given file name.
#[derive(Debug)]
pub struct FaultyRuntime {
    inner: TestRuntime,
    poisoned: String,
    fault: Fault,
}

impl FaultyRuntime {
    pub fn new(root: PathBuf, poisoned: impl Into<String>, fault: Fault) -> Self {
        Self {
            inner: TestRuntime::new(root),
            poisoned: poisoned.into(),
            fault,
        }
    }

    fn is_poisoned(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == self.poisoned)
    }
}

#[async_trait]
impl Runtime for FaultyRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        if self.is_poisoned(path) {
            match self.fault {
                Fault::Error => {
                    return Err(RuntimeError::Io(format!(
                        "injected failure reading {}",
                        path.display()
                    )));
                }
                Fault::Panic => panic!("injected panic reading {}", path.display()),
            }
        }
        self.inner.read_file(path).await
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        self.inner.write_file(path, content).await
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        self.inner.metadata(path).await
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn current_dir(&self) -> RuntimeResult<PathBuf> {
        self.inner.current_dir()
    }
}

/// Create a temporary project from `(relative path, contents)` pairs.
///
/// Keep the returned `TempDir` alive for as long as the files are needed.
pub fn create_test_project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");
    for (relative, contents) in files {
        let path = temp.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture directory");
        }
        std::fs::write(&path, contents).expect("failed to write fixture file");
    }
    temp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_round_trips_through_disk() {
        let temp = create_test_project(&[]);
        let runtime = TestRuntime::new(temp.path().to_path_buf());
        let target = temp.path().join("nested/out.json");

        runtime.write_file(&target, b"{\"ok\":true}").await.unwrap();
        assert_eq!(runtime.read_file(&target).await.unwrap(), b"{\"ok\":true}");
        assert_eq!(runtime.current_dir().unwrap(), temp.path());
    }

    #[tokio::test]
    async fn missing_fixture_is_not_found() {
        let temp = create_test_project(&[]);
        let runtime = TestRuntime::new(temp.path().to_path_buf());

        let err = runtime
            .read_file(&temp.path().join("missing.ts"))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn faulty_runtime_only_fails_poisoned_file() {
        let temp = create_test_project(&[("ok.ts", "a"), ("poison.ts", "b")]);
        let runtime = FaultyRuntime::new(temp.path().to_path_buf(), "poison.ts", Fault::Error);

        assert!(runtime.read_file(&temp.path().join("ok.ts")).await.is_ok());
        let err = runtime
            .read_file(&temp.path().join("poison.ts"))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Io(_)));
    }

    #[test]
    fn creates_nested_fixture_files() {
        let temp = create_test_project(&[("src/a/b.ts", "export const b = 1;")]);
        let content = std::fs::read_to_string(temp.path().join("src/a/b.ts")).unwrap();
        assert_eq!(content, "export const b = 1;");
    }
}
