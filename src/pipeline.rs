//! Sequential installation pipeline.
//!
//! Detect → Resolve → Fetch → Locate → Verify → Install → PostVerify,
//! linear, with no backward transitions and no retries between stages.
//! Every stage's failure is terminal for the run except the final
//! search-path check, which degrades to a warning. The workspace is
//! torn down on every exit path before the result is surfaced.

use crate::asset::AssetSpec;
use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::exec::CommandExecutor;
use crate::extraction::ArchiveExtractor;
use crate::fetch::AssetDownloader;
use crate::http::HttpError;
use crate::install::{InstallReport, Installer, post_processor_for};
use crate::locate::{LocatedBinary, default_strategies, locate_binary};
use crate::output::{path_remediation, success_message, write_stderr_line};
use crate::platform::Platform;
use crate::post_verify::{PathCheck, check_command};
use crate::release::{self, ReleaseIndex, ReleaseRef};
use crate::verify::verify_format;
use crate::workspace::Workspace;
use camino::Utf8PathBuf;
use std::io::Write;

/// Collaborators injected into one pipeline run.
///
/// Production wiring uses the HTTP index/downloader, the gzip
/// extractor, and the system command executor; tests inject stubs.
pub struct PipelineDeps<'a> {
    /// Remote release index for latest-tag resolution.
    pub index: &'a dyn ReleaseIndex,
    /// Asset downloader.
    pub downloader: &'a dyn AssetDownloader,
    /// Archive extractor.
    pub extractor: &'a dyn ArchiveExtractor,
    /// External command executor for escalation and post-processing.
    pub executor: &'a dyn CommandExecutor,
}

/// Caller options for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit release tag; `None` resolves the latest.
    pub tag: Option<String>,
    /// Suppress progress output (warnings still shown).
    pub quiet: bool,
}

/// The outcome of a successful run.
#[derive(Debug)]
pub struct InstallOutcome {
    /// The release that was installed.
    pub release: ReleaseRef,
    /// Where the binary was installed.
    pub installed_path: Utf8PathBuf,
    /// Whether privilege escalation was used.
    pub escalated: bool,
    /// Non-fatal post-processing warnings.
    pub warnings: Vec<String>,
    /// Whether the installed command resolves on the search path.
    pub command_on_path: bool,
}

/// Run the full pipeline against the detected host platform.
///
/// # Errors
///
/// Returns the first terminal error from any stage; see
/// [`InstallerError`] for the taxonomy.
pub fn run(
    config: &InstallerConfig,
    options: &RunOptions,
    deps: &PipelineDeps<'_>,
    stderr: &mut dyn Write,
) -> Result<InstallOutcome> {
    let platform = Platform::detect()?;
    run_with_platform(config, &platform, options, deps, stderr)
}

/// Run the pipeline for an explicit platform.
///
/// This is the testable seam: [`run`] delegates here after host
/// detection, and tests drive it with a fixed platform.
///
/// # Errors
///
/// As for [`run`].
pub fn run_with_platform(
    config: &InstallerConfig,
    platform: &Platform,
    options: &RunOptions,
    deps: &PipelineDeps<'_>,
    stderr: &mut dyn Write,
) -> Result<InstallOutcome> {
    if !options.quiet {
        write_stderr_line(
            stderr,
            format!("Installing {} for {platform}...", config.binary_name),
        );
    }

    let release = resolve_release(config, options, deps, stderr)?;

    // The workspace must be gone before the result is surfaced,
    // whichever way the staged work ended.
    let workspace = Workspace::create()?;
    let staged = fetch_and_install(config, platform, &release, &workspace, deps, options, stderr);
    workspace.close();
    let report = staged?;

    for warning in &report.warnings {
        write_stderr_line(stderr, format!("warning: {warning}"));
    }

    let command_on_path = report_path_check(config, &report, options, stderr);

    Ok(InstallOutcome {
        release,
        installed_path: report.installed_path,
        escalated: report.escalated,
        warnings: report.warnings,
        command_on_path,
    })
}

/// Resolve the release to install, reporting progress.
fn resolve_release(
    config: &InstallerConfig,
    options: &RunOptions,
    deps: &PipelineDeps<'_>,
    stderr: &mut dyn Write,
) -> Result<ReleaseRef> {
    if let Some(tag) = options.tag.as_deref() {
        if !options.quiet {
            write_stderr_line(stderr, format!("Installing version {tag}."));
        }
        return release::resolve(Some(tag), deps.index, config);
    }

    if !options.quiet {
        write_stderr_line(stderr, "Resolving the latest release...");
    }
    let release = release::resolve(None, deps.index, config)?;
    if !options.quiet {
        write_stderr_line(stderr, format!("Latest release: {release}."));
    }
    Ok(release)
}

/// Fetch, locate, verify, and install inside the workspace scope.
fn fetch_and_install(
    config: &InstallerConfig,
    platform: &Platform,
    release: &ReleaseRef,
    workspace: &Workspace,
    deps: &PipelineDeps<'_>,
    options: &RunOptions,
    stderr: &mut dyn Write,
) -> Result<InstallReport> {
    let spec = AssetSpec::derive(config, platform, release);
    let archive_path = workspace.root().join(&spec.filename);

    if !options.quiet {
        write_stderr_line(stderr, format!("Downloading {}...", spec.filename));
    }
    deps.downloader
        .download(&spec, &archive_path)
        .map_err(|e| download_failed(&spec, &e))?;

    if !options.quiet {
        write_stderr_line(stderr, "Extracting archive...");
    }
    deps.extractor
        .extract(archive_path.as_std_path(), workspace.root().as_std_path())
        .map_err(|e| InstallerError::ArchiveCorrupt {
            path: archive_path.clone(),
            reason: e.to_string(),
        })?;

    let strategies = default_strategies(config, platform);
    let binary = locate_binary(workspace.root(), &config.binary_name, &strategies)?;

    let format = verify_format(&binary, platform.os())?;
    if !options.quiet {
        write_stderr_line(stderr, format!("Verified {format}."));
    }

    install_binary(config, platform, &binary, deps, options, stderr)
}

/// Install the verified binary under the fixed command name.
fn install_binary(
    config: &InstallerConfig,
    platform: &Platform,
    binary: &LocatedBinary,
    deps: &PipelineDeps<'_>,
    options: &RunOptions,
    stderr: &mut dyn Write,
) -> Result<InstallReport> {
    if !options.quiet {
        write_stderr_line(
            stderr,
            format!("Installing to {}...", config.install_path()),
        );
    }
    let post = post_processor_for(platform.os(), deps.executor);
    Installer::new(config, deps.executor).install(binary, post.as_ref())
}

/// Run the search-path check and report the result. The soft failure
/// is a warning; the run still succeeds.
fn report_path_check(
    config: &InstallerConfig,
    report: &InstallReport,
    options: &RunOptions,
    stderr: &mut dyn Write,
) -> bool {
    match check_command(&config.command_name) {
        PathCheck::Resolved { .. } => {
            if !options.quiet {
                write_stderr_line(stderr, "");
                write_stderr_line(stderr, success_message(config, &report.installed_path));
            }
            true
        }
        PathCheck::NotOnPath => {
            write_stderr_line(stderr, "");
            write_stderr_line(stderr, path_remediation(config));
            false
        }
    }
}

/// Map a download failure onto the installer taxonomy, phrasing 404s
/// around missing versions or not-yet-uploaded assets.
fn download_failed(spec: &AssetSpec, error: &HttpError) -> InstallerError {
    let reason = match error {
        HttpError::NotFound { .. } => "asset not found (HTTP 404)".to_owned(),
        HttpError::RequestFailed { reason, .. } => reason.clone(),
        HttpError::Io(e) => e.to_string(),
    };
    InstallerError::DownloadFailed {
        url: spec.download_url.clone(),
        reason,
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
