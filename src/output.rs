//! Progress and remediation text for the installer CLI.
//!
//! All user-facing output goes to an injected stderr sink so tests can
//! capture it; write failures are best-effort and never abort a run.

use crate::config::InstallerConfig;
use crate::platform::Platform;
use camino::Utf8Path;
use std::io::Write;

/// Format the success message after installation.
#[must_use]
pub fn success_message(config: &InstallerConfig, installed_path: &Utf8Path) -> String {
    format!(
        concat!(
            "Successfully installed {} to {}\n\n",
            "Run `{}` to start the file manager."
        ),
        config.binary_name, installed_path, config.command_name
    )
}

/// Remediation text for an installed command that does not resolve on
/// the search path.
#[must_use]
pub fn path_remediation(config: &InstallerConfig) -> String {
    format!(
        concat!(
            "warning: {} was installed to {} but does not resolve on your PATH.\n",
            "Add the following to your shell profile (~/.bashrc or ~/.zshrc):\n",
            "  export PATH=\"{}:$PATH\""
        ),
        config.command_name, config.install_dir, config.install_dir
    )
}

/// Configuration information for dry-run output.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The fixed installer configuration.
    pub config: &'a InstallerConfig,
    /// The detected host platform.
    pub platform: &'a Platform,
    /// The explicit tag, when one was given.
    pub tag: Option<&'a str>,
    /// The asset filename that would be downloaded.
    pub asset_filename: &'a str,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let version = self
            .tag
            .map_or("latest (resolved at install time)".to_owned(), str::to_owned);
        [
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Platform: {}", self.platform),
            format!("Version: {version}"),
            format!("Asset: {}", self.asset_filename),
            format!(
                "Install target: {} (installed as `{}`)",
                self.config.install_path(),
                self.config.command_name
            ),
        ]
        .join("\n")
    }
}

/// Write a line to the given sink, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}
