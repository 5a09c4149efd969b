//! System-wide installation.
//!
//! Copies the located binary into the fixed install directory under the
//! fixed command name and makes it executable. Privilege escalation via
//! `sudo` is attempted only after an unprivileged attempt is denied.
//! macOS post-processing (quarantine clearing, ad-hoc signing) is
//! best-effort: failures become structured warnings on the report, not
//! errors.

use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::exec::{CommandExecutor, failure_detail};
use crate::locate::LocatedBinary;
use crate::platform::HostOs;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::ErrorKind;

/// The result of a completed installation.
#[derive(Debug)]
pub struct InstallReport {
    /// Where the binary was installed.
    pub installed_path: Utf8PathBuf,
    /// Whether privilege escalation was used.
    pub escalated: bool,
    /// Non-fatal post-processing failures.
    pub warnings: Vec<String>,
}

/// OS-specific post-processing capability.
///
/// On macOS the installed copy has its downloaded-file quarantine
/// attribute cleared and receives an ad-hoc code signature. Both steps
/// are best-effort; an unsigned or quarantined binary is still usable,
/// just with extra prompts.
pub trait PostProcessor {
    /// Clear the downloaded-file quarantine attribute.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure; callers record it as a
    /// warning.
    fn clear_quarantine(&self, path: &Utf8Path) -> std::result::Result<(), String>;

    /// Apply an ad-hoc code signature.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure; callers record it as a
    /// warning.
    fn ad_hoc_sign(&self, path: &Utf8Path) -> std::result::Result<(), String>;
}

/// macOS post-processor shelling out to `xattr` and `codesign`.
pub struct MacPostProcessor<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> MacPostProcessor<'a> {
    /// Create a post-processor using the given executor.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }

    fn run_step(&self, cmd: &str, args: &[&str]) -> std::result::Result<(), String> {
        let output = self.executor.run(cmd, args).map_err(|e| e.to_string())?;
        if output.status.success() {
            Ok(())
        } else {
            Err(failure_detail(&output))
        }
    }
}

impl PostProcessor for MacPostProcessor<'_> {
    fn clear_quarantine(&self, path: &Utf8Path) -> std::result::Result<(), String> {
        self.run_step("xattr", &["-d", "com.apple.quarantine", path.as_str()])
    }

    fn ad_hoc_sign(&self, path: &Utf8Path) -> std::result::Result<(), String> {
        self.run_step("codesign", &["--force", "--sign", "-", path.as_str()])
    }
}

/// No-op post-processor for platforms without post-processing steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPostProcessor;

impl PostProcessor for NoopPostProcessor {
    fn clear_quarantine(&self, _path: &Utf8Path) -> std::result::Result<(), String> {
        Ok(())
    }

    fn ad_hoc_sign(&self, _path: &Utf8Path) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Select the post-processor for a host OS.
#[must_use]
pub fn post_processor_for<'a>(
    os: HostOs,
    executor: &'a dyn CommandExecutor,
) -> Box<dyn PostProcessor + 'a> {
    match os {
        HostOs::MacOs => Box::new(MacPostProcessor::new(executor)),
        HostOs::Linux => Box::new(NoopPostProcessor),
    }
}

/// Installs the located binary under the configured command name.
pub struct Installer<'a> {
    config: &'a InstallerConfig,
    executor: &'a dyn CommandExecutor,
}

impl<'a> Installer<'a> {
    /// Create an installer for the given configuration.
    #[must_use]
    pub fn new(config: &'a InstallerConfig, executor: &'a dyn CommandExecutor) -> Self {
        Self { config, executor }
    }

    /// Copy the binary to the install target and make it executable.
    ///
    /// Installation is an idempotent overwrite; an existing command at
    /// the target path is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InstallWriteFailed`] when the copy or
    /// permission change fails even with escalated privileges.
    pub fn install(
        &self,
        binary: &LocatedBinary,
        post: &dyn PostProcessor,
    ) -> Result<InstallReport> {
        let target = self.config.install_path();
        let dir_escalated = self.ensure_install_dir()?;
        let copy_escalated = self.place_binary(binary.path(), &target)?;

        let mut warnings = Vec::new();
        if let Err(reason) = post.clear_quarantine(&target) {
            let warning = format!("could not clear quarantine attribute: {reason}");
            log::warn!("{warning}");
            warnings.push(warning);
        }
        if let Err(reason) = post.ad_hoc_sign(&target) {
            let warning = format!("could not apply ad-hoc signature: {reason}");
            log::warn!("{warning}");
            warnings.push(warning);
        }

        Ok(InstallReport {
            installed_path: target,
            escalated: dir_escalated || copy_escalated,
            warnings,
        })
    }

    /// Create the install directory if missing. Returns whether
    /// escalation was used.
    fn ensure_install_dir(&self) -> Result<bool> {
        let dir = &self.config.install_dir;
        if dir.as_std_path().is_dir() {
            return Ok(false);
        }
        match std::fs::create_dir_all(dir) {
            Ok(()) => Ok(false),
            Err(e) if needs_escalation(&e) => {
                self.escalated_mkdir(dir)?;
                Ok(true)
            }
            Err(e) => Err(write_failed(dir.clone(), &e.to_string())),
        }
    }

    /// Copy and chmod without privileges, escalating on denial.
    /// Returns whether escalation was used.
    fn place_binary(&self, source: &Utf8Path, target: &Utf8Path) -> Result<bool> {
        match copy_unprivileged(source, target) {
            Ok(()) => Ok(false),
            Err(e) if needs_escalation(&e) => {
                self.escalated_install(source, target)?;
                Ok(true)
            }
            Err(e) => Err(write_failed(target.to_owned(), &e.to_string())),
        }
    }

    fn escalated_mkdir(&self, dir: &Utf8Path) -> Result<()> {
        self.run_escalated(&["mkdir", "-p", dir.as_str()], dir)
    }

    fn escalated_install(&self, source: &Utf8Path, target: &Utf8Path) -> Result<()> {
        self.run_escalated(&["cp", source.as_str(), target.as_str()], target)?;
        self.run_escalated(&["chmod", "755", target.as_str()], target)
    }

    fn run_escalated(&self, args: &[&str], context: &Utf8Path) -> Result<()> {
        let output = self
            .executor
            .run("sudo", args)
            .map_err(|e| write_failed(context.to_owned(), &e.to_string()))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(write_failed(context.to_owned(), &failure_detail(&output)))
        }
    }
}

/// Copy and chmod with the current user's privileges.
fn copy_unprivileged(source: &Utf8Path, target: &Utf8Path) -> std::io::Result<()> {
    std::fs::copy(source, target)?;
    make_executable(target)
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> std::io::Result<()> {
    Ok(())
}

/// Whether the unprivileged attempt should be retried with escalation.
fn needs_escalation(error: &std::io::Error) -> bool {
    error.kind() == ErrorKind::PermissionDenied
}

fn write_failed(path: Utf8PathBuf, reason: &str) -> InstallerError {
    InstallerError::InstallWriteFailed {
        path,
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
