//! Senterm installer CLI entrypoint.
//!
//! This binary turns a published senterm release into a working `sen`
//! command: it resolves the version, downloads and extracts the platform
//! artefact, verifies the binary, and installs it system-wide.

use clap::Parser;
use senterm_installer::asset::asset_filename;
use senterm_installer::cli::Cli;
use senterm_installer::config::InstallerConfig;
use senterm_installer::error::Result;
use senterm_installer::exec::SystemCommandExecutor;
use senterm_installer::extraction::GzipExtractor;
use senterm_installer::fetch::HttpAssetDownloader;
use senterm_installer::output::{DryRunInfo, write_stderr_line};
use senterm_installer::pipeline::{self, PipelineDeps, RunOptions};
use senterm_installer::platform::Platform;
use senterm_installer::release::GithubReleaseIndex;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = InstallerConfig::default();

    // Dry-run mode: show what would be done without side effects.
    if cli.dry_run {
        return run_dry(cli, &config, stderr);
    }

    let index = GithubReleaseIndex;
    let downloader = HttpAssetDownloader;
    let extractor = GzipExtractor;
    let executor = SystemCommandExecutor;
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: cli.tag.clone(),
        quiet: cli.quiet,
    };

    pipeline::run(&config, &options, &deps, stderr)?;
    Ok(())
}

/// Runs in dry-run mode: platform detection only, no network access.
/// Without an explicit tag the version is reported as deferred rather
/// than resolved.
fn run_dry(cli: &Cli, config: &InstallerConfig, stderr: &mut dyn Write) -> Result<()> {
    let platform = Platform::detect()?;
    let filename = asset_filename(config, &platform);
    let info = DryRunInfo {
        config,
        platform: &platform,
        tag: cli.tag.as_deref(),
        asset_filename: &filename,
    };
    write_stderr_line(stderr, info.display_text());
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
