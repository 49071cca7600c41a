//! Messages exchanged between the coordinator and workers.

use rustc_hash::FxHashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::hash::FileHash;
use crate::types::{FileEntry, NodePackage, SourceFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker#{}", self.0)
    }
}

/// The part of a discovered file a job needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFile {
    pub path: PathBuf,
    pub hash: FileHash,
    pub import_specifiers: Vec<String>,
}

impl From<&FileEntry> for JobFile {
    fn from(entry: &FileEntry) -> Self {
        Self {
            path: entry.path.clone(),
            hash: entry.hash.clone(),
            import_specifiers: entry.import_specifiers.clone(),
        }
    }
}

/// What the coordinator knew when a job was dispatched.
///
/// Shared read-only between every job dispatched before the next merge.
#[derive(Debug, Default)]
pub struct KnownSnapshot {
    pub files: FxHashSet<FileHash>,
    pub packages: FxHashSet<String>,
}

#[derive(Debug)]
pub struct JobRequest {
    pub job_id: JobId,
    pub file: JobFile,
    pub snapshot: Arc<KnownSnapshot>,
}

/// Everything one job contributes to the graph.
#[derive(Debug)]
pub struct JobReport {
    /// Hash of the file the job processed.
    pub file_hash: FileHash,
    /// Files this file imports, in specifier order.
    pub imports: Vec<FileHash>,
    /// Imported files absent from the snapshot, already parsed.
    pub new_files: Vec<SourceFile>,
    /// Packages absent from the snapshot.
    pub new_packages: Vec<NodePackage>,
    /// Names of every package this file imports.
    pub package_names: Vec<String>,
}

#[derive(Debug)]
pub enum WorkerResponse {
    Result {
        job_id: JobId,
        worker_id: WorkerId,
        report: JobReport,
    },
    Error {
        job_id: JobId,
        worker_id: WorkerId,
        error: String,
    },
}

impl WorkerResponse {
    pub fn job_id(&self) -> JobId {
        match self {
            WorkerResponse::Result { job_id, .. } | WorkerResponse::Error { job_id, .. } => {
                *job_id
            }
        }
    }

    pub fn worker_id(&self) -> WorkerId {
        match self {
            WorkerResponse::Result { worker_id, .. }
            | WorkerResponse::Error { worker_id, .. } => *worker_id,
        }
    }
}
