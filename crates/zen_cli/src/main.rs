//! zen CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Stub not readable
//! - 4: Directory creation failed
//! - 5: Write failed
//! - 6: Unresolved placeholders (strict mode)

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zen_helpers::StubError;

mod commands;

use commands::{Cli, Commands, UnresolvedPlaceholders};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const STUB_NOT_READABLE: u8 = 3;
    pub const DIRECTORY_CREATION_FAILED: u8 = 4;
    pub const WRITE_FAILED: u8 = 5;
    pub const UNRESOLVED_PLACEHOLDERS: u8 = 6;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::RenderDir(args) => commands::render_dir::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_directives = if verbose {
        "zen=debug,zen_helpers=debug"
    } else if quiet {
        "warn"
    } else {
        "zen=info,zen_helpers=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    // Already initialized is fine
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(stub_error) = cause.downcast_ref::<StubError>() {
            return match stub_error {
                StubError::StubNotReadable { .. } => ExitCodes::STUB_NOT_READABLE,
                StubError::DirectoryCreationFailed { .. } => ExitCodes::DIRECTORY_CREATION_FAILED,
                StubError::WriteFailed { .. } => ExitCodes::WRITE_FAILED,
                StubError::InvalidPattern { .. } | StubError::PathEscapesDestination { .. } => {
                    ExitCodes::INVALID_ARGS
                }
            };
        }
        if cause.downcast_ref::<UnresolvedPlaceholders>().is_some() {
            return ExitCodes::UNRESOLVED_PLACEHOLDERS;
        }
        if cause.downcast_ref::<commands::vars::VarsFileError>().is_some() {
            return ExitCodes::INVALID_ARGS;
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_categorize_stub_errors() {
        let err = anyhow::Error::new(StubError::WriteFailed {
            path: PathBuf::from("out.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(categorize_error(&err), ExitCodes::WRITE_FAILED);
    }

    #[test]
    fn test_categorize_looks_through_context() {
        let result: Result<(), StubError> = Err(StubError::StubNotReadable {
            path: PathBuf::from("stub.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        let err = result.context("Failed to render stub").unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::STUB_NOT_READABLE);
    }

    #[test]
    fn test_categorize_escaping_path_as_invalid_args() {
        let err = anyhow::Error::new(StubError::PathEscapesDestination {
            path: PathBuf::from("../escaped.txt"),
            destination: PathBuf::from("out"),
        });
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_categorize_unresolved() {
        let err = anyhow::Error::new(UnresolvedPlaceholders {
            location: "out.txt".to_string(),
            tokens: vec!["{{name}}".to_string()],
        });
        assert_eq!(categorize_error(&err), ExitCodes::UNRESOLVED_PLACEHOLDERS);
    }

    #[test]
    fn test_categorize_other() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }
}
