//! `tsexplorer parse`: build the graph and optionally export it.

use std::sync::Arc;

use tracing::info;
use tsexplorer_graph::{GraphBuilder, GraphSink, JsonSnapshotSink, NativeRuntime, Runtime};

use crate::cli::ParseArgs;
use crate::config::{CliOverrides, LoadedConfig, ProjectConfig};
use crate::error::{Result, ResultExt};

/// Execute the parse command.
///
/// 1. Load and validate the configuration
/// 2. Build the graph
/// 3. Print statistics, write the JSON snapshot if requested
pub async fn execute(args: ParseArgs) -> Result<()> {
    let cwd = super::current_dir()?;
    let overrides = CliOverrides::from_parse_args(&args);
    let loaded = ProjectConfig::load(&args.project, &overrides, &cwd)?;
    loaded.validate()?;

    let runtime: Arc<dyn Runtime> = Arc::new(NativeRuntime::new());
    let maps = builder_for(&loaded, Arc::clone(&runtime)).build().await?;

    let stats = maps.statistics();
    println!("files:         {}", stats.files);
    println!("entry files:   {}", stats.entry_files);
    println!("nodes:         {}", stats.nodes);
    println!("import edges:  {}", stats.import_edges);
    println!("packages:      {}", stats.packages);
    println!("package edges: {}", stats.package_edges);

    if let Some(output) = &loaded.config.output {
        let output = cwd.join(output);
        let mut sink = JsonSnapshotSink::new(runtime, &output);
        if let Some(name) = &loaded.config.project_name {
            sink = sink.project_name(name);
        }
        sink.persist(&loaded.project_id(), &maps)
            .await
            .context("Failed to write graph snapshot")?;
        info!("Graph written to {}", output.display());
    }

    Ok(())
}

/// Translate a loaded configuration into a builder.
pub(crate) fn builder_for(loaded: &LoadedConfig, runtime: Arc<dyn Runtime>) -> GraphBuilder {
    let config = &loaded.config;
    let mut builder = GraphBuilder::new()
        .root(&loaded.root)
        .entries(config.entry_points.iter())
        .resolve_file_nodes(config.resolve_file_nodes)
        .resolve_imported_modules(config.resolve_imported_modules)
        .skip_node_modules(config.skip_node_modules)
        .runtime(runtime);

    if let Some(tsconfig) = &config.tsconfig {
        builder = builder.tsconfig(tsconfig);
    }
    if let Some(jobs) = config.jobs {
        builder = builder.pool_size(jobs);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ProjectArgs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_builder_for_maps_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("tsexplorer.config.json"),
            r#"{
                "entryPoints": ["src/a.ts", "src/b.ts"],
                "tsconfig": "tsconfig.json",
                "resolveImportedModules": false,
                "jobs": 5
            }"#,
        )
        .unwrap();

        let loaded = ProjectConfig::load(
            &ProjectArgs::default(),
            &CliOverrides::default(),
            temp.path(),
        )
        .unwrap();
        let builder = builder_for(&loaded, Arc::new(NativeRuntime::new()));

        let config = builder.config();
        assert_eq!(
            config.entries,
            vec![PathBuf::from("src/a.ts"), PathBuf::from("src/b.ts")]
        );
        assert_eq!(
            config.resolution.tsconfig,
            Some(PathBuf::from("tsconfig.json"))
        );
        assert!(!config.resolve_imported_modules);
        assert!(config.skip_node_modules);
        assert_eq!(config.effective_pool_size(), 5);
    }
}
