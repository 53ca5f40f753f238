//! CLI command definitions.

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::warn;
use zen_helpers::unresolved_placeholders;

pub mod render;
pub mod render_dir;
pub mod vars;

/// zen - render stub files into place
#[derive(Parser)]
#[command(name = "zen")]
#[command(version, about = "zen - render stub files into place")]
#[command(long_about = r#"
zen copies stub files to their destination, replacing literal placeholder
tokens and creating any missing directories.

COMMANDS:
  render      → Render a single stub file
  render-dir  → Render every stub below a directory

PLACEHOLDERS:
  --set name=Zenigata replaces {{name}}. Use --literal to match keys verbatim.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Stub not readable
  4 - Directory creation failed
  5 - Write failed
  6 - Unresolved placeholders (--strict)
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a stub file to a destination
    Render(render::RenderArgs),

    /// Render a directory of stubs into a destination directory
    #[command(name = "render-dir")]
    RenderDir(render_dir::RenderDirArgs),
}

/// Rendered output still contains placeholder tokens.
#[derive(Error, Debug)]
#[error("Unresolved placeholders in {location}: {}", .tokens.join(", "))]
pub struct UnresolvedPlaceholders {
    pub location: String,
    pub tokens: Vec<String>,
}

/// Warn about leftover tokens, or fail when `strict` is set.
pub(crate) fn check_unresolved(
    content: &str,
    location: &str,
    strict: bool,
) -> Result<(), UnresolvedPlaceholders> {
    let tokens = unresolved_placeholders(content);
    if tokens.is_empty() {
        return Ok(());
    }

    if strict {
        return Err(UnresolvedPlaceholders {
            location: location.to_string(),
            tokens,
        });
    }

    warn!("Unresolved placeholders in {}: {}", location, tokens.join(", "));
    Ok(())
}
