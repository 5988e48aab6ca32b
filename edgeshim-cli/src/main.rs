//! edgeshim CLI - Command-line interface
//!
//! Loads a build directory into an in-memory asset store and inspects it
//! through the same resolver the render server uses.

mod commands;
mod error;
mod runner;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::cat::CatArgs;
use crate::commands::resolve::ResolveArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Parser)]
#[command(name = "edgeshim")]
#[command(version = edgeshim::VERSION)]
#[command(about = "Inspect framework build output as an edge host sees it", long_about = None)]
struct Cli {
    /// Config file (default: per-user config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project directory containing the build output
    #[arg(long, global = true)]
    assets_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the build id
    BuildId,
    /// Resolve a page to its built file
    Resolve(ResolveArgs),
    /// Print an asset by logical path
    Cat(CatArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.config.as_deref(), cli.assets_dir, cli.debug)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::BuildId => commands::build_id::run(&runner, &mut out),
        Commands::Resolve(args) => commands::resolve::run(&runner, &args, &mut out),
        Commands::Cat(args) => commands::cat::run(&runner, &args, &mut out),
    }
}
