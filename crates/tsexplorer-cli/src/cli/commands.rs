use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available tsexplorer subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index a project
    ///
    /// Parses every file reachable from the entry points and reports graph
    /// statistics. With --output, also writes the graph as JSON.
    Parse(ParseArgs),

    /// Validate configuration
    ///
    /// Loads tsexplorer.config.json plus overrides, validates it, and checks
    /// that the entry points exist. Nothing is parsed.
    Check(CheckArgs),
}

/// Options shared by every command that needs a project configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct ProjectArgs {
    /// Path to the config file (default: ./tsexplorer.config.json if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root; entry points and tsconfig are relative to it
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Entry point (repeatable)
    ///
    /// Examples:
    ///   tsexplorer parse --entry src/index.ts
    ///   tsexplorer parse -e src/main.ts -e src/worker.ts
    #[arg(short, long = "entry", value_name = "FILE")]
    pub entries: Vec<PathBuf>,

    /// tsconfig.json used for path aliases
    #[arg(long, value_name = "FILE")]
    pub tsconfig: Option<PathBuf>,
}

/// Arguments for the parse command
#[derive(Args, Debug, Default, Clone)]
pub struct ParseArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Do not extract syntax nodes
    #[arg(long)]
    pub no_nodes: bool,

    /// Parse the entry points only, without following imports
    #[arg(long)]
    pub no_follow: bool,

    /// Parse files inside node_modules instead of only recording packages
    #[arg(long)]
    pub include_node_modules: bool,

    /// Number of worker tasks (default: available cores minus one)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Write the graph as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Identifier recorded in the JSON snapshot
    #[arg(long, value_name = "ID")]
    pub project_id: Option<String>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}
