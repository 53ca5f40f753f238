//! Render command - render a single stub.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::check_unresolved;
use super::vars::PlaceholderArgs;

#[derive(Args)]
pub struct RenderArgs {
    /// Stub file to render
    stub: PathBuf,

    /// Destination file (parent directories are created)
    destination: PathBuf,

    #[command(flatten)]
    placeholders: PlaceholderArgs,

    /// Print the rendered content instead of writing it
    #[arg(long)]
    dry_run: bool,
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let placeholders = args.placeholders.placeholders()?;

    // Read once; the checked buffer is the one that gets written.
    let rendered = zen_helpers::render_bytes(&args.stub, &placeholders)
        .with_context(|| format!("Failed to render stub {:?}", args.stub))?;
    check_unresolved(
        &String::from_utf8_lossy(&rendered),
        &args.destination.display().to_string(),
        args.placeholders.strict,
    )?;

    if args.dry_run {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&rendered)?;
        stdout.flush()?;
        return Ok(());
    }

    zen_helpers::write_rendered(&args.destination, &rendered)
        .with_context(|| format!("Failed to render stub {:?}", args.stub))?;

    info!("Rendered {:?} to {:?}", args.stub, args.destination);
    Ok(())
}
