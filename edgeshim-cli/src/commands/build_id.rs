//! `build-id` command.

use std::io::Write;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Print the trimmed build id.
pub fn run(runner: &CliRunner, out: &mut impl Write) -> Result<(), CliError> {
    let build_id = runner.resolver().build_id()?;
    writeln!(out, "{}", build_id).map_err(CliError::Output)
}
