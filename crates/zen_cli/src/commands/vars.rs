//! Placeholder arguments shared by the render commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use zen_helpers::Placeholders;

#[derive(Args, Debug, Clone, Default)]
pub struct PlaceholderArgs {
    /// Placeholder value as KEY=VALUE (repeatable)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Load placeholder values from a .yaml, .yml, .json or .toml file
    #[arg(long, value_name = "FILE")]
    pub vars: Option<PathBuf>,

    /// Match keys verbatim instead of wrapping them as {{KEY}}
    #[arg(long)]
    pub literal: bool,

    /// Fail when rendered output still contains {{placeholders}}
    #[arg(long)]
    pub strict: bool,
}

impl PlaceholderArgs {
    /// Build the placeholder mapping. `--set` values override file values.
    pub fn placeholders(&self) -> Result<Placeholders> {
        let mut variables = match &self.vars {
            Some(path) => load_vars_file(path)
                .with_context(|| format!("Failed to load placeholder file {:?}", path))?,
            None => Vec::new(),
        };
        variables.extend(self.set.iter().cloned());

        debug!("Loaded {} placeholder values", variables.len());

        Ok(if self.literal {
            variables.into_iter().collect()
        } else {
            Placeholders::wrapped(variables)
        })
    }
}

/// Placeholder file problems the user can fix by changing arguments.
#[derive(Error, Debug)]
pub enum VarsFileError {
    #[error("Unsupported placeholder file format: {0:?} (expected .yaml, .yml, .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid placeholder file {path:?}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Scalar values accepted in placeholder files.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Load a flat map of placeholder values, choosing the format by extension.
pub fn load_vars_file(path: &Path) -> Result<Vec<(String, String)>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let invalid = |message: String| VarsFileError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    let map: BTreeMap<String, Scalar> = match extension.as_str() {
        "yaml" | "yml" => {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?
        }
        "json" => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?
        }
        "toml" => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| invalid(e.to_string()))?
        }
        _ => return Err(VarsFileError::UnsupportedFormat(path.to_path_buf()).into()),
    };

    Ok(map
        .into_iter()
        .map(|(key, value)| (key, value.into_string()))
        .collect())
}

/// Parse a KEY=VALUE assignment. The value may itself contain '='.
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
