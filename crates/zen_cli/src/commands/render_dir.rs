//! Render-dir command - render a directory of stubs.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use zen_helpers::RenderDirOptions;

use super::check_unresolved;
use super::vars::PlaceholderArgs;

#[derive(Args)]
pub struct RenderDirArgs {
    /// Directory containing the stubs
    stub_dir: PathBuf,

    /// Directory to render into
    destination_dir: PathBuf,

    /// Only render files matching this glob (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    include: Vec<String>,

    /// Suffix removed from rendered file names, e.g. ".stub"
    #[arg(long, value_name = "SUFFIX")]
    strip_suffix: Option<String>,

    #[command(flatten)]
    placeholders: PlaceholderArgs,
}

pub fn execute(args: RenderDirArgs) -> Result<()> {
    let placeholders = args.placeholders.placeholders()?;

    let options = RenderDirOptions {
        include: args.include,
        strip_suffix: args.strip_suffix,
    };

    let written = zen_helpers::render_dir(
        &args.stub_dir,
        &args.destination_dir,
        &placeholders,
        &options,
    )
    .with_context(|| format!("Failed to render stubs from {:?}", args.stub_dir))?;

    // Files are already in place at this point; strict mode only changes the exit status.
    for path in &written {
        let content = fs::read(path).with_context(|| format!("Failed to read back {:?}", path))?;
        check_unresolved(
            &String::from_utf8_lossy(&content),
            &path.display().to_string(),
            args.placeholders.strict,
        )?;
    }

    if written.is_empty() {
        info!("No stubs matched in {:?}", args.stub_dir);
    } else {
        println!("Rendered {} files into {}", written.len(), args.destination_dir.display());
    }

    Ok(())
}
