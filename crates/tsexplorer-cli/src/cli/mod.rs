//! Command-line interface definition for tsexplorer.
//!
//! # Command Structure
//!
//! - `tsexplorer parse` - Index a project into a dependency graph
//! - `tsexplorer check` - Validate configuration and entry points

mod commands;

use clap::Parser;

pub use commands::{CheckArgs, Command, ParseArgs, ProjectArgs};

/// tsexplorer - index TypeScript projects into content-addressed graphs
#[derive(Parser, Debug)]
#[command(
    name = "tsexplorer",
    version,
    about = "Index a TypeScript project into a dependency graph",
    long_about = "tsexplorer walks a TypeScript/JavaScript project from its entry points,\n\
                  follows static imports, and records files, syntax nodes, import edges\n\
                  and external packages as a content-addressed graph."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
