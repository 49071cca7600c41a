//! `tsexplorer check`: validate configuration without parsing.

use tsexplorer_graph::builder::normalize_path;

use crate::cli::CheckArgs;
use crate::config::{CliOverrides, ProjectConfig};
use crate::error::{CliError, Result, ResultExt};

/// Execute the check command.
///
/// Fails when the configuration is invalid or none of the entry points exist.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let cwd = super::current_dir()?;
    let overrides = CliOverrides::from_project_args(&args.project);
    let loaded = ProjectConfig::load(&args.project, &overrides, &cwd)?;
    loaded.validate()?;

    match &loaded.config_file {
        Some(path) => println!("config:  {}", path.display()),
        None => println!("config:  (none, using defaults and flags)"),
    }
    println!("root:    {}", loaded.root.display());

    let mut found = 0;
    for entry in &loaded.config.entry_points {
        let path = normalize_path(&loaded.root, entry);
        if path.is_file() {
            found += 1;
            println!("  ok       {}", path.display());
        } else {
            println!("  missing  {}", path.display());
        }
    }

    if found == 0 {
        return Err(CliError::Custom(format!(
            "None of the {} entry point(s) exist",
            loaded.config.entry_points.len()
        )))
        .with_hint("Entry points are resolved against the project root");
    }

    println!(
        "{}/{} entry point(s) found",
        found,
        loaded.config.entry_points.len()
    );
    Ok(())
}
