//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use edgeshim::assets::AssetError;
use edgeshim::config::ConfigFileError;
use edgeshim::context::ContextError;
use edgeshim::resolver::ResolveError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Configuration file could not be read or is invalid
    Config(ConfigFileError),
    /// No build directory given on the command line or in the config
    MissingAssetsDir,
    /// Build directory could not be loaded
    Assets(AssetError),
    /// Server settings are inconsistent
    Context(ContextError),
    /// Lookup against the build failed
    Resolve(ResolveError),
    /// Asset does not exist
    AssetNotFound(String),
    /// Failed to write to stdout
    Output(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    ///
    /// Lookups that find nothing exit with 2, everything else with 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingAssetsDir => {
                eprintln!();
                eprintln!("Pass --assets-dir <DIR> or set assets_dir under [server] in:");
                eprintln!("  {}", edgeshim::config::config_file_path().display());
            }
            CliError::Resolve(ResolveError::Manifest { .. }) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The directory is not a project root (no .next/ inside)");
                eprintln!("  2. The build did not finish: run the framework build again");
                eprintln!("  3. dist_dir under [server] does not match the build's dist directory");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::AssetNotFound(_) => 2,
            CliError::Resolve(err) if err.is_not_found() => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::MissingAssetsDir => write!(f, "No build directory configured"),
            CliError::Assets(e) => write!(f, "Failed to load build directory: {}", e),
            CliError::Context(e) => write!(f, "Invalid server settings: {}", e),
            CliError::Resolve(e) => write!(f, "{}", e),
            CliError::AssetNotFound(path) => write!(f, "asset not found: {}", path),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Assets(e) => Some(e),
            CliError::Context(e) => Some(e),
            CliError::Resolve(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<AssetError> for CliError {
    fn from(e: AssetError) -> Self {
        CliError::Assets(e)
    }
}

impl From<ContextError> for CliError {
    fn from(e: ContextError) -> Self {
        CliError::Context(e)
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        CliError::Resolve(e)
    }
}
