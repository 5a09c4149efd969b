//! Binary location inside the extracted workspace.
//!
//! Release archives have shipped with several layouts over time: the
//! binary at the archive root, under a platform-named directory, or
//! under a conventional `release/` directory. Location is modelled as
//! an ordered list of strategies; the first match under that ordering
//! wins, and a recursive filename search is the last resort. Adding a
//! new archive layout means adding a strategy, not editing branch
//! logic.

use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::platform::Platform;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// The single executable discovered inside the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedBinary {
    path: Utf8PathBuf,
}

impl LocatedBinary {
    /// Wrap an already-known binary path.
    ///
    /// Production code goes through [`locate_binary`]; this constructor
    /// exists for callers that already hold a verified path.
    #[must_use]
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    /// The path of the located binary within the workspace.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl fmt::Display for LocatedBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A single candidate-resolution strategy.
///
/// Strategies are probed in a fixed priority order; each either finds a
/// candidate, finds nothing, or fails hard (the recursive strategy
/// refuses ambiguity).
pub trait LocateStrategy {
    /// Probe for the binary under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::AmbiguousBinary`] when a strategy
    /// matches more than one file, and I/O errors from directory
    /// traversal.
    fn locate(&self, root: &Utf8Path, binary_name: &str) -> Result<Option<Utf8PathBuf>>;
}

/// Probes the workspace root for the canonical binary name.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootStrategy;

impl LocateStrategy for RootStrategy {
    fn locate(&self, root: &Utf8Path, binary_name: &str) -> Result<Option<Utf8PathBuf>> {
        Ok(file_at(&root.join(binary_name)))
    }
}

/// Probes a fixed subdirectory of the workspace.
#[derive(Debug, Clone)]
pub struct SubdirStrategy {
    subdir: String,
}

impl SubdirStrategy {
    /// Create a strategy probing `subdir` under the workspace root.
    #[must_use]
    pub fn new(subdir: impl Into<String>) -> Self {
        Self {
            subdir: subdir.into(),
        }
    }
}

impl LocateStrategy for SubdirStrategy {
    fn locate(&self, root: &Utf8Path, binary_name: &str) -> Result<Option<Utf8PathBuf>> {
        Ok(file_at(&root.join(&self.subdir).join(binary_name)))
    }
}

/// Recursive filename search; the last resort.
///
/// Exactly one match is required: more than one candidate is an
/// [`InstallerError::AmbiguousBinary`] error, never an arbitrary pick.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveStrategy;

impl LocateStrategy for RecursiveStrategy {
    fn locate(&self, root: &Utf8Path, binary_name: &str) -> Result<Option<Utf8PathBuf>> {
        let mut matches = Vec::new();
        collect_matches(root, binary_name, &mut matches)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => {
                matches.sort();
                Err(InstallerError::AmbiguousBinary {
                    binary_name: binary_name.to_owned(),
                    candidates: matches,
                })
            }
        }
    }
}

/// The default strategy ordering for a platform.
///
/// Root, then the platform-named directory the archive unpacks to, then
/// the conventional `release/` directory, then recursive search.
#[must_use]
pub fn default_strategies(
    config: &InstallerConfig,
    platform: &Platform,
) -> Vec<Box<dyn LocateStrategy>> {
    let platform_dir = format!("{}-{}", config.binary_name, platform.asset_suffix());
    vec![
        Box::new(RootStrategy),
        Box::new(SubdirStrategy::new(platform_dir)),
        Box::new(SubdirStrategy::new("release")),
        Box::new(RecursiveStrategy),
    ]
}

/// Locate the single installable binary under `root`.
///
/// # Errors
///
/// Returns [`InstallerError::BinaryNotFound`] (with a listing of the
/// workspace contents) when no strategy matches, and propagates
/// [`InstallerError::AmbiguousBinary`] from the recursive fallback.
pub fn locate_binary(
    root: &Utf8Path,
    binary_name: &str,
    strategies: &[Box<dyn LocateStrategy>],
) -> Result<LocatedBinary> {
    for strategy in strategies {
        if let Some(path) = strategy.locate(root, binary_name)? {
            return Ok(LocatedBinary { path });
        }
    }
    Err(InstallerError::BinaryNotFound {
        binary_name: binary_name.to_owned(),
        listing: workspace_listing(root),
    })
}

/// Return the path if it is an existing regular file.
fn file_at(path: &Utf8Path) -> Option<Utf8PathBuf> {
    path.is_file().then(|| path.to_owned())
}

/// Collect every file named `binary_name` under `root`.
fn collect_matches(
    dir: &Utf8Path,
    binary_name: &str,
    matches: &mut Vec<Utf8PathBuf>,
) -> Result<()> {
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_matches(path, binary_name, matches)?;
        } else if path.file_name() == Some(binary_name) {
            matches.push(path.to_owned());
        }
    }
    Ok(())
}

/// Render the workspace contents for the [`InstallerError::BinaryNotFound`]
/// report. Always non-empty.
fn workspace_listing(root: &Utf8Path) -> String {
    let mut lines = Vec::new();
    append_listing(root, root, &mut lines);
    if lines.is_empty() {
        lines.push("  (workspace is empty)".to_owned());
    }
    lines.join("\n")
}

fn append_listing(root: &Utf8Path, dir: &Utf8Path, lines: &mut Vec<String>) {
    let Ok(entries) = dir.read_dir_utf8() else {
        return;
    };
    let mut paths: Vec<Utf8PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path().to_owned()))
        .collect();
    paths.sort();
    for path in paths {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if path.is_dir() {
            lines.push(format!("  {relative}/"));
            append_listing(root, &path, lines);
        } else {
            lines.push(format!("  {relative}"));
        }
    }
}

#[cfg(test)]
#[path = "locate_tests.rs"]
mod tests;
