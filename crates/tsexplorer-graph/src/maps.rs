//! The aggregate result of one indexing run.

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::Serialize;
use std::path::Path;

use crate::hash::{FileHash, NodeHash};
use crate::types::{FileEntry, NodePackage, SourceNode};

/// Insertion-ordered set; equality ignores order.
pub type EdgeSet<T> = IndexSet<T, FxBuildHasher>;

/// Files, nodes, and the relationships between them.
///
/// Every `declare_*` method is idempotent: re-inserting a key that is already
/// present changes nothing. Merging the same contributions in any order
/// yields equal maps.
///
/// A node hash does not include the file path, so identical nodes in
/// different files share a hash. Node data and parent links are therefore
/// stored per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserMaps {
    pub files: FxHashMap<FileHash, FileEntry>,
    /// Each file's nodes in pre-order.
    pub file_nodes: FxHashMap<FileHash, Vec<SourceNode>>,
    /// Node hash to the files that contain it.
    pub node_files: FxHashMap<NodeHash, EdgeSet<FileHash>>,
    /// Importing file to imported files.
    pub imports: FxHashMap<FileHash, EdgeSet<FileHash>>,
    /// `(file, node)` to the node's parent within that file.
    pub node_parents: FxHashMap<(FileHash, NodeHash), NodeHash>,
    /// Package registry keyed by normalized name.
    pub packages: FxHashMap<String, NodePackage>,
    /// File to names of the packages it imports.
    pub file_packages: FxHashMap<FileHash, EdgeSet<String>>,
}

/// Size summary of a `ParserMaps`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub files: usize,
    pub entry_files: usize,
    /// Distinct node hashes across all files.
    pub nodes: usize,
    pub import_edges: usize,
    pub packages: usize,
    pub package_edges: usize,
}

impl ParserMaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file and its nodes.
    ///
    /// Returns `false` if the file hash was already present.
    pub fn declare_file(&mut self, entry: FileEntry, nodes: Vec<SourceNode>) -> bool {
        if self.files.contains_key(&entry.hash) {
            return false;
        }

        let file_hash = entry.hash.clone();
        for node in &nodes {
            self.node_files
                .entry(node.hash.clone())
                .or_default()
                .insert(file_hash.clone());
            if let Some(parent) = &node.parent_hash {
                self.node_parents
                    .insert((file_hash.clone(), node.hash.clone()), parent.clone());
            }
        }

        self.file_nodes.insert(file_hash.clone(), nodes);
        self.files.insert(file_hash, entry);
        true
    }

    /// Record an import edge.
    pub fn declare_import(&mut self, from: &FileHash, to: &FileHash) {
        self.imports
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
    }

    /// Register a package. The first version observed for a name is kept.
    ///
    /// Returns `true` if the name was new.
    pub fn declare_package(&mut self, package: NodePackage) -> bool {
        if self.packages.contains_key(&package.name) {
            return false;
        }
        self.packages.insert(package.name.clone(), package);
        true
    }

    /// Record that a file imports a package.
    pub fn declare_file_package(&mut self, file: &FileHash, package_name: &str) {
        self.file_packages
            .entry(file.clone())
            .or_default()
            .insert(package_name.to_string());
    }

    /// Entry files, in no particular order.
    pub fn entry_files(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.values().filter(|file| file.is_entrypoint)
    }

    pub fn file_by_path(&self, path: &Path) -> Option<&FileEntry> {
        self.files.values().find(|file| file.path == path)
    }

    /// Files imported by `file`.
    pub fn imports_of(&self, file: &FileHash) -> impl Iterator<Item = &FileHash> {
        self.imports.get(file).into_iter().flatten()
    }

    /// Files that import `file`.
    pub fn importers_of<'m>(&'m self, file: &'m FileHash) -> impl Iterator<Item = &'m FileHash> {
        self.imports
            .iter()
            .filter(move |(_, targets)| targets.contains(file))
            .map(|(from, _)| from)
    }

    /// A file's nodes in pre-order.
    pub fn nodes_of(&self, file: &FileHash) -> &[SourceNode] {
        self.file_nodes
            .get(file)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Parent of `node` as it occurs in `file`.
    pub fn parent_of(&self, file: &FileHash, node: &NodeHash) -> Option<&NodeHash> {
        self.node_parents.get(&(file.clone(), node.clone()))
    }

    /// Direct children of `parent` within `file`, in source order.
    pub fn node_children(&self, file: &FileHash, parent: &NodeHash) -> Vec<&SourceNode> {
        self.nodes_of(file)
            .iter()
            .filter(|node| node.parent_hash.as_ref() == Some(parent))
            .collect()
    }

    /// Files whose trees contain a node with this hash.
    pub fn files_with_node(&self, node: &NodeHash) -> impl Iterator<Item = &FileHash> {
        self.node_files.get(node).into_iter().flatten()
    }

    /// Package names imported by `file`.
    pub fn packages_of(&self, file: &FileHash) -> impl Iterator<Item = &String> {
        self.file_packages.get(file).into_iter().flatten()
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            files: self.files.len(),
            entry_files: self.entry_files().count(),
            nodes: self.node_files.len(),
            import_edges: self.imports.values().map(|targets| targets.len()).sum(),
            packages: self.packages.len(),
            package_edges: self.file_packages.values().map(|names| names.len()).sum(),
        }
    }
}
