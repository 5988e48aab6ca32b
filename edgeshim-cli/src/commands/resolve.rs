//! `resolve` command.

use std::io::Write;

use clap::Args;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Page to resolve, e.g. `/` or `/blog/[slug]`
    pub page: String,

    /// Check the app-paths manifest before the pages manifest
    #[arg(long)]
    pub app: bool,

    /// Also match manifest entries under the configured locale prefixes
    #[arg(long)]
    pub locales: bool,

    /// Print whether the page is static HTML or a module
    #[arg(long)]
    pub kind: bool,
}

/// Print the built file for a page.
pub fn run(runner: &CliRunner, args: &ResolveArgs, out: &mut impl Write) -> Result<(), CliError> {
    let resolver = runner.resolver();
    let locales = if args.locales {
        resolver.context().locales()
    } else {
        None
    };

    let page_path = resolver.resolve_page_path(&args.page, locales, args.app)?;

    if args.kind {
        // A directory build registers files only, so a module page counts as
        // present when either a loaded module or its source file exists.
        let present = if page_path.ends_with(".html") {
            resolver.asset_exists(&page_path)
        } else {
            resolver.read_module(&page_path).is_ok() || resolver.asset_exists(&page_path)
        };
        let kind = match (present, page_path.ends_with(".html")) {
            (false, _) => "missing",
            (true, true) => "static",
            (true, false) => "module",
        };
        writeln!(out, "{}\t{}", page_path, kind).map_err(CliError::Output)
    } else {
        writeln!(out, "{}", page_path).map_err(CliError::Output)
    }
}
