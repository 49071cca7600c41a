//! Module specifier resolution.
//!
//! `ModuleResolver` wraps `oxc_resolver` with TypeScript-oriented defaults
//! and classifies every hit as internal (project file) or external
//! (`node_modules`). Unresolvable specifiers and Node builtins yield `None`.

use oxc_resolver::{
    ResolveError, ResolveOptions, Resolver, TsconfigDiscovery, TsconfigOptions,
    TsconfigReferences,
};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ResolutionConfig;
use crate::package_json::{self, PackageJson};
use crate::runtime::Runtime;
use crate::types::{NodePackage, ResolvedModule};

/// Resolves import specifiers relative to the importing file.
///
/// Holds no mutable state visible to callers. One instance is shared by every
/// worker; `oxc_resolver` caches filesystem lookups internally.
pub struct ModuleResolver {
    resolver: Resolver,
    tsconfig: Option<PathBuf>,
}

impl fmt::Debug for ModuleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleResolver")
            .field("tsconfig", &self.tsconfig)
            .finish_non_exhaustive()
    }
}

impl ModuleResolver {
    /// Build a resolver for a project.
    ///
    /// Without an explicit tsconfig, `<root>/tsconfig.json` is used when it
    /// exists so `paths` and `baseUrl` aliases apply.
    pub fn new(config: &ResolutionConfig, runtime: &dyn Runtime) -> Self {
        let tsconfig = config.tsconfig.clone().or_else(|| {
            let candidate = config.root.join("tsconfig.json");
            runtime.exists(&candidate).then_some(candidate)
        });

        let options = ResolveOptions {
            tsconfig: tsconfig.as_ref().map(|config_file| {
                TsconfigDiscovery::Manual(TsconfigOptions {
                    config_file: config_file.clone(),
                    references: TsconfigReferences::Auto,
                })
            }),
            extensions: config.extensions.clone(),
            extension_alias: vec![
                (
                    ".js".into(),
                    vec![".ts".into(), ".tsx".into(), ".d.ts".into(), ".js".into()],
                ),
                (".mjs".into(), vec![".mts".into(), ".mjs".into()]),
                (".cjs".into(), vec![".cts".into(), ".cjs".into()]),
            ],
            condition_names: config.condition_names.clone(),
            main_fields: config.main_fields.clone(),
            // Keep resolved paths spelled like entry paths so file hashes agree
            symlinks: false,
            builtin_modules: true,
            ..Default::default()
        };

        Self {
            resolver: Resolver::new(options),
            tsconfig,
        }
    }

    /// The tsconfig in effect, if any.
    pub fn tsconfig(&self) -> Option<&Path> {
        self.tsconfig.as_deref()
    }

    /// Resolve a specifier to a file path, without classifying it.
    pub fn resolve_path(&self, importing: &Path, specifier: &str) -> Option<PathBuf> {
        let directory = importing.parent().unwrap_or(importing);

        match self.resolver.resolve(directory, specifier) {
            Ok(resolution) => Some(resolution.path().to_path_buf()),
            Err(ResolveError::Builtin { .. }) => None,
            Err(err) => {
                // TypeScript falls back to DefinitelyTyped for bare specifiers
                if let Some(types_specifier) = types_fallback(specifier) {
                    if let Ok(resolution) = self.resolver.resolve(directory, &types_specifier) {
                        return Some(resolution.path().to_path_buf());
                    }
                }
                debug!(
                    "Unresolved '{}' from {}: {}",
                    specifier,
                    importing.display(),
                    err
                );
                None
            }
        }
    }

    /// Resolve and classify a specifier.
    ///
    /// External hits carry their owning package when its `package.json`
    /// provides both a name and a version.
    pub async fn resolve(
        &self,
        importing: &Path,
        specifier: &str,
        runtime: &dyn Runtime,
    ) -> Option<ResolvedModule> {
        let path = self.resolve_path(importing, specifier)?;

        if !package_json::is_node_modules_path(&path) {
            return Some(ResolvedModule::Internal(path));
        }

        let package = self.package_for(&path, runtime).await;
        Some(ResolvedModule::External { path, package })
    }

    async fn package_for(&self, path: &Path, runtime: &dyn Runtime) -> Option<NodePackage> {
        let manifest = package_json::package_root(path)?.join("package.json");
        if !runtime.exists(&manifest) {
            return None;
        }

        match PackageJson::from_path(runtime, &manifest).await {
            Ok(pkg) => pkg.to_node_package(),
            Err(err) => {
                debug!("Ignoring {}: {}", manifest.display(), err);
                None
            }
        }
    }
}

/// `@types/` specifier for a bare package import, if it is one.
fn types_fallback(specifier: &str) -> Option<String> {
    if specifier.starts_with('.')
        || specifier.starts_with('/')
        || specifier.starts_with("@types/")
        || specifier.contains(':')
    {
        return None;
    }

    let package = package_json::extract_package_name(specifier);
    if package.is_empty() {
        return None;
    }
    let subpath = &specifier[package.len()..];
    let mangled = match package.strip_prefix('@') {
        Some(scoped) => scoped.replacen('/', "__", 1),
        None => package.to_string(),
    };

    Some(format!("@types/{mangled}{subpath}"))
}
