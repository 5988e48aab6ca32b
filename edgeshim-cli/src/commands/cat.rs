//! `cat` command.

use std::io::Write;

use clap::Args;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `cat`.
#[derive(Debug, Args)]
pub struct CatArgs {
    /// Logical path; relative paths start at the project directory
    pub path: String,

    /// Print the content type instead of the content
    #[arg(long)]
    pub content_type: bool,
}

/// Write an asset's bytes to `out`.
pub fn run(runner: &CliRunner, args: &CatArgs, out: &mut impl Write) -> Result<(), CliError> {
    let logical_path = runner.logical_path(&args.path);
    let record = runner
        .resolver()
        .read_asset(&logical_path)
        .ok_or_else(|| CliError::AssetNotFound(logical_path.clone()))?;

    if args.content_type {
        writeln!(out, "{}", record.content_type()).map_err(CliError::Output)
    } else {
        out.write_all(record.bytes()).map_err(CliError::Output)
    }
}
