//! Records produced while indexing a project.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::hash::{FileHash, NodeHash};

/// One parsed source file.
///
/// Created at most once per run; the builder deduplicates by `hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub hash: FileHash,
    pub is_entrypoint: bool,
    /// Raw specifiers in first-occurrence order, deduplicated.
    pub import_specifiers: Vec<String>,
    pub content: String,
    /// Flattened syntax tree. Empty when node extraction is disabled.
    pub nodes: Vec<SourceNode>,
}

impl SourceFile {
    /// Split off the node list, leaving the file record.
    pub fn into_parts(self) -> (FileEntry, Vec<SourceNode>) {
        let entry = FileEntry {
            path: self.path,
            hash: self.hash,
            is_entrypoint: self.is_entrypoint,
            import_specifiers: self.import_specifiers,
            content: self.content,
        };
        (entry, self.nodes)
    }
}

/// File record as stored in `ParserMaps::files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub path: PathBuf,
    pub hash: FileHash,
    pub is_entrypoint: bool,
    pub import_specifiers: Vec<String>,
    pub content: String,
}

/// One syntax node in a file's flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    pub hash: NodeHash,
    /// Byte offset of the first character.
    pub start: u32,
    /// Byte offset one past the last character.
    pub end: u32,
    pub text: String,
    pub kind: String,
    /// `None` only for direct children of the program root.
    pub parent_hash: Option<NodeHash>,
}

/// An external package, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePackage {
    pub name: String,
    pub version: String,
}

/// Outcome of resolving one import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedModule {
    /// A project file.
    Internal(PathBuf),
    /// A file under `node_modules`.
    External {
        path: PathBuf,
        /// Owning package; absent when its `package.json` lacks a name or version.
        package: Option<NodePackage>,
    },
}
