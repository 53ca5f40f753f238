//! Stub rendering.
//!
//! A stub is a plain file containing literal placeholder tokens. Rendering
//! reads the stub, substitutes the tokens and writes the result to a
//! destination, creating any missing parent directories on the way.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use glob::Pattern;
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{StubError, StubResult};
use crate::placeholders::Placeholders;

/// Render `stub` into `destination`, replacing every placeholder token.
///
/// The stub is read in full before anything is written, so a missing or
/// unreadable stub never touches the destination. Missing parent directories
/// of `destination` are created; they are not removed again if the final
/// write fails. An existing destination file is overwritten.
pub fn render(
    stub: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    placeholders: &Placeholders,
) -> StubResult<()> {
    let stub = stub.as_ref();
    let destination = destination.as_ref();

    let rendered = render_bytes(stub, placeholders)?;
    write_rendered(destination, &rendered)?;

    debug!("Rendered {:?} to {:?}", stub, destination);
    Ok(())
}

/// Read `stub` and substitute its placeholders without writing anything.
pub fn render_bytes(stub: impl AsRef<Path>, placeholders: &Placeholders) -> StubResult<Vec<u8>> {
    let content = read_stub(stub.as_ref())?;
    Ok(placeholders.substitute(&content))
}

/// Like [`render_bytes`], decoded as UTF-8. Invalid sequences are replaced.
pub fn render_to_string(
    stub: impl AsRef<Path>,
    placeholders: &Placeholders,
) -> StubResult<String> {
    let rendered = render_bytes(stub, placeholders)?;
    Ok(String::from_utf8_lossy(&rendered).into_owned())
}

/// Write already rendered content to `destination`, creating missing parent
/// directories first.
pub fn write_rendered(destination: impl AsRef<Path>, content: &[u8]) -> StubResult<()> {
    let destination = destination.as_ref();

    ensure_parent_dir(destination)?;

    fs::write(destination, content).map_err(|source| StubError::WriteFailed {
        path: destination.to_path_buf(),
        source,
    })
}

/// Options for [`render_dir`].
#[derive(Debug, Clone, Default)]
pub struct RenderDirOptions {
    /// Glob patterns matched against paths relative to the stub directory.
    /// Empty means every file.
    pub include: Vec<String>,
    /// Suffix stripped from rendered file names, e.g. `.stub`.
    pub strip_suffix: Option<String>,
}

impl RenderDirOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    pub fn strip_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.strip_suffix = Some(suffix.into());
        self
    }
}

/// Render every stub file below `stub_dir` into the mirrored location under
/// `destination_dir`.
///
/// Relative paths go through the same placeholder substitution as the
/// contents. Returns the written files in walk order.
pub fn render_dir(
    stub_dir: impl AsRef<Path>,
    destination_dir: impl AsRef<Path>,
    placeholders: &Placeholders,
    options: &RenderDirOptions,
) -> StubResult<Vec<PathBuf>> {
    let stub_dir = stub_dir.as_ref();
    let destination_dir = destination_dir.as_ref();

    let patterns = options
        .include
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| StubError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect::<StubResult<Vec<_>>>()?;

    let metadata = fs::metadata(stub_dir).map_err(|source| not_readable(stub_dir, source))?;
    if !metadata.is_dir() {
        return Err(not_readable(
            stub_dir,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    debug!("Rendering stubs from {:?} to {:?}", stub_dir, destination_dir);

    let mut written = Vec::new();
    for entry in WalkDir::new(stub_dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(stub_dir).to_path_buf();
            StubError::StubNotReadable {
                path,
                source: io::Error::from(err),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(stub_dir) else {
            continue;
        };

        if !patterns.is_empty() && !patterns.iter().any(|p| p.matches_path(relative)) {
            debug!("Skipping {:?}", relative);
            continue;
        }

        let rendered =
            rendered_relative_path(relative, placeholders, options.strip_suffix.as_deref());
        if !stays_within(&rendered) {
            return Err(StubError::PathEscapesDestination {
                path: rendered,
                destination: destination_dir.to_path_buf(),
            });
        }

        let target = destination_dir.join(&rendered);
        render(entry.path(), &target, placeholders)?;
        written.push(target);
    }

    debug!("Rendered {} stubs", written.len());
    Ok(written)
}

/// List the distinct `{{identifier}}` tokens left in `content`, in order of
/// first appearance.
pub fn unresolved_placeholders(content: &str) -> Vec<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"\{\{[a-zA-Z_][a-zA-Z0-9_]*\}\}").expect("placeholder pattern is valid")
    });

    let mut found: Vec<String> = Vec::new();
    for m in pattern.find_iter(content) {
        if !found.iter().any(|f| f == m.as_str()) {
            found.push(m.as_str().to_string());
        }
    }
    found
}

fn read_stub(path: &Path) -> StubResult<Vec<u8>> {
    let metadata = fs::metadata(path).map_err(|source| not_readable(path, source))?;
    if !metadata.is_file() {
        return Err(not_readable(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    fs::read(path).map_err(|source| not_readable(path, source))
}

fn ensure_parent_dir(destination: &Path) -> StubResult<()> {
    let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    if parent.is_dir() {
        // An existing parent still has to be accessible; write permission is
        // left to the final write.
        return match fs::read_dir(parent) {
            Err(source) if source.kind() == io::ErrorKind::PermissionDenied => {
                Err(StubError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        };
    }

    fs::create_dir_all(parent).map_err(|source| StubError::DirectoryCreationFailed {
        path: parent.to_path_buf(),
        source,
    })?;
    debug!("Created directory {:?}", parent);
    Ok(())
}

fn not_readable(path: &Path, source: io::Error) -> StubError {
    StubError::StubNotReadable {
        path: path.to_path_buf(),
        source,
    }
}

/// Whether joining `relative` onto a directory stays inside it. Only plain
/// names and `.` are allowed.
fn stays_within(relative: &Path) -> bool {
    let mut components = relative.components().peekable();
    components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn rendered_relative_path(
    relative: &Path,
    placeholders: &Placeholders,
    strip_suffix: Option<&str>,
) -> PathBuf {
    let mut path = PathBuf::from(placeholders.substitute_str(&relative.to_string_lossy()));

    let stripped = strip_suffix
        .filter(|suffix| !suffix.is_empty())
        .and_then(|suffix| {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(suffix))
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
        });
    if let Some(name) = stripped {
        path.set_file_name(name);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_placeholders() {
        let found = unresolved_placeholders("{{a}} {{b}} {{a}} {{ not_a_token }} {{9x}}");
        assert_eq!(found, vec!["{{a}}".to_string(), "{{b}}".to_string()]);
    }

    #[test]
    fn test_unresolved_placeholders_none() {
        assert!(unresolved_placeholders("plain text").is_empty());
    }

    #[test]
    fn test_rendered_relative_path() {
        let placeholders = Placeholders::wrapped([("name", "billing")]);
        let path = rendered_relative_path(
            Path::new("src/{{name}}/mod.rs.stub"),
            &placeholders,
            Some(".stub"),
        );
        assert_eq!(path, PathBuf::from("src/billing/mod.rs"));
    }

    #[test]
    fn test_strip_suffix_keeps_bare_suffix_name() {
        let path = rendered_relative_path(Path::new(".stub"), &Placeholders::new(), Some(".stub"));
        assert_eq!(path, PathBuf::from(".stub"));
    }

    #[test]
    fn test_stays_within() {
        assert!(stays_within(Path::new("src/billing.rs")));
        assert!(stays_within(Path::new("./README.md")));
        assert!(!stays_within(Path::new("../escaped.txt")));
        assert!(!stays_within(Path::new("src/../../escaped.txt")));
        assert!(!stays_within(Path::new("/etc/passwd")));
        assert!(!stays_within(Path::new("")));
    }

    #[test]
    fn test_render_dir_options_builder() {
        let opts = RenderDirOptions::new()
            .include("**/*.stub")
            .strip_suffix(".stub");

        assert_eq!(opts.include, vec!["**/*.stub".to_string()]);
        assert_eq!(opts.strip_suffix.as_deref(), Some(".stub"));
    }
}
