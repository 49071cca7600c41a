//! package.json loading and package name handling.

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use crate::runtime::{self, Runtime};
use crate::types::NodePackage;
use crate::{Error, Result};

/// Maximum package.json size (10MB)
const MAX_PACKAGE_JSON_SIZE: u64 = 10 * 1024 * 1024;

const TYPES_SCOPE: &str = "@types/";

/// The package.json fields the graph cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    /// Package name
    pub name: Option<String>,
    /// Package version
    pub version: Option<String>,
    /// Where the manifest was read from
    #[serde(skip)]
    pub path: PathBuf,
}

impl PackageJson {
    /// Read and parse a manifest. Anything over 10MB is rejected unread.
    pub async fn from_path(runtime: &dyn Runtime, path: &Path) -> Result<Self> {
        let metadata = runtime.metadata(path).await.map_err(|e| {
            Error::InvalidConfig(format!("Cannot read package.json metadata: {e}"))
        })?;

        if metadata.size > MAX_PACKAGE_JSON_SIZE {
            return Err(Error::InvalidConfig(format!(
                "package.json exceeds maximum size of {}MB",
                MAX_PACKAGE_JSON_SIZE / 1024 / 1024
            )));
        }

        let content = runtime::read_to_string(runtime, path)
            .await
            .map_err(|e| Error::InvalidConfig(format!("Failed to read package.json: {e}")))?;

        let mut pkg: PackageJson = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidConfig(format!("Invalid package.json format: {e}")))?;

        pkg.path = path.to_path_buf();
        Ok(pkg)
    }

    /// Convert to a graph package, normalizing `@types/` names.
    ///
    /// Returns `None` when either the name or the version is missing.
    pub fn to_node_package(&self) -> Option<NodePackage> {
        let name = self.name.as_deref()?;
        let version = self.version.as_deref()?;
        Some(NodePackage {
            name: normalize_package_name(name),
            version: version.to_string(),
        })
    }
}

/// Package name part of a bare specifier: `lodash/fp` gives `lodash`,
/// `@babel/core/lib/index` gives `@babel/core`.
pub fn extract_package_name(specifier: &str) -> &str {
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    match specifier.match_indices('/').nth(segments - 1) {
        Some((end, _)) => &specifier[..end],
        None => specifier,
    }
}

/// Collapse a DefinitelyTyped package name onto the runtime package name.
///
/// `@types/react` becomes `react`, and the mangled scoped form
/// `@types/babel__core` becomes `@babel/core`.
pub fn normalize_package_name(name: &str) -> String {
    let Some(stripped) = name.strip_prefix(TYPES_SCOPE) else {
        return name.to_string();
    };

    match stripped.split_once("__") {
        Some((scope, package)) if !scope.is_empty() && !package.is_empty() => {
            format!("@{scope}/{package}")
        }
        _ => stripped.to_string(),
    }
}

/// Directory of the package that owns a file inside `node_modules`.
///
/// Uses the innermost `node_modules` segment so nested and pnpm-style
/// layouts resolve to the package that physically contains the file.
pub fn package_root(path: &Path) -> Option<PathBuf> {
    let components: Vec<Component<'_>> = path.components().collect();
    let marker = components
        .iter()
        .rposition(|c| c.as_os_str() == "node_modules")?;

    let first = components.get(marker + 1)?;
    let is_scoped = first.as_os_str().to_string_lossy().starts_with('@');
    let depth = if is_scoped { marker + 3 } else { marker + 2 };
    if depth > components.len() {
        return None;
    }

    Some(components[..depth].iter().collect())
}

/// Whether a path lies under any `node_modules` directory.
pub fn is_node_modules_path(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == "node_modules")
}
