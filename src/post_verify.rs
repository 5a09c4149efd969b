//! Post-install command resolution.
//!
//! Confirms the installed command resolves via the current search path.
//! A binary that installed correctly but does not resolve is a warning
//! outcome, not an error: only its discoverability is in question, and
//! the run still exits successfully.

use camino::Utf8PathBuf;
use std::ffi::OsStr;

/// The result of the search-path check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathCheck {
    /// The command resolves on the search path.
    Resolved {
        /// The path the command resolves to.
        path: Utf8PathBuf,
    },
    /// The command does not resolve; remediation text applies.
    NotOnPath,
}

impl PathCheck {
    /// Whether the command resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Check whether `command_name` resolves via the process `PATH`.
#[must_use]
pub fn check_command(command_name: &str) -> PathCheck {
    check_command_in(command_name, std::env::var_os("PATH").as_deref())
}

/// Check whether `command_name` resolves via an explicit search path.
///
/// Entries that do not exist, are not valid UTF-8, or hold a
/// non-executable file of the right name are skipped.
#[must_use]
pub fn check_command_in(command_name: &str, path_var: Option<&OsStr>) -> PathCheck {
    let Some(path_var) = path_var else {
        return PathCheck::NotOnPath;
    };
    for dir in std::env::split_paths(path_var) {
        let candidate = dir.join(command_name);
        if is_executable_file(&candidate) {
            if let Ok(path) = Utf8PathBuf::from_path_buf(candidate) {
                return PathCheck::Resolved { path };
            }
        }
    }
    PathCheck::NotOnPath
}

#[cfg(unix)]
fn is_executable_file(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &std::path::Path) -> bool {
    path.is_file()
}
