//! Unit tests for pipeline orchestration.

use super::*;
use crate::extraction::MockArchiveExtractor;
use crate::fetch::MockAssetDownloader;
use crate::release::MockReleaseIndex;
use crate::test_utils::{ScriptedExecutor, fake_elf_bytes};
use std::sync::{Arc, Mutex};

fn linux() -> Platform {
    Platform::from_os_arch("linux", "x86_64").expect("supported")
}

/// Config installing into a writable temp dir.
fn test_config() -> (tempfile::TempDir, InstallerConfig) {
    let temp = tempfile::tempdir().expect("temp dir");
    let install_dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("UTF-8 path");
    let config = InstallerConfig {
        install_dir,
        ..InstallerConfig::default()
    };
    (temp, config)
}

/// An index that must never be queried.
fn untouched_index() -> MockReleaseIndex {
    let mut index = MockReleaseIndex::new();
    index.expect_latest_release_body().times(0);
    index
}

/// A downloader that records the destination directory and writes a
/// placeholder archive there.
fn recording_downloader(seen_dir: &Arc<Mutex<Option<Utf8PathBuf>>>) -> MockAssetDownloader {
    let seen = Arc::clone(seen_dir);
    let mut downloader = MockAssetDownloader::new();
    downloader.expect_download().returning(move |_, dest| {
        *seen.lock().expect("seen lock") = dest.parent().map(camino::Utf8Path::to_owned);
        std::fs::write(dest, b"placeholder archive").map_err(crate::http::HttpError::Io)?;
        Ok(())
    });
    downloader
}

/// An extractor that fakes extraction by writing an ELF binary at the
/// workspace root.
fn planting_extractor() -> MockArchiveExtractor {
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().returning(|_, dest_dir| {
        std::fs::write(dest_dir.join("senterm"), fake_elf_bytes())?;
        Ok(vec!["senterm".to_owned()])
    });
    extractor
}

#[test]
fn explicit_tag_run_installs_without_querying_the_index() {
    let (_temp, config) = test_config();
    let index = untouched_index();
    let seen_dir = Arc::new(Mutex::new(None));
    let downloader = recording_downloader(&seen_dir);
    let extractor = planting_extractor();
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: Some("v0.1.0".to_owned()),
        quiet: true,
    };

    let mut stderr = Vec::new();
    let outcome =
        run_with_platform(&config, &linux(), &options, &deps, &mut stderr).expect("run succeeds");

    assert_eq!(outcome.release.tag(), "v0.1.0");
    assert_eq!(outcome.installed_path, config.install_dir.join("sen"));
    assert!(outcome.installed_path.as_std_path().is_file());
    assert!(!outcome.escalated);
    assert!(outcome.warnings.is_empty());

    let workspace_root = seen_dir
        .lock()
        .expect("seen lock")
        .clone()
        .expect("downloader ran");
    assert!(
        !workspace_root.as_std_path().exists(),
        "workspace should be removed after the run"
    );
}

#[test]
fn latest_run_resolves_tag_from_the_index() {
    let (_temp, config) = test_config();
    let mut index = MockReleaseIndex::new();
    index
        .expect_latest_release_body()
        .return_once(|_| Ok("{\"tag_name\":\"v0.4.2\"}".to_owned()));
    let seen_dir = Arc::new(Mutex::new(None));
    let downloader = recording_downloader(&seen_dir);
    let extractor = planting_extractor();
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: None,
        quiet: true,
    };

    let mut stderr = Vec::new();
    let outcome =
        run_with_platform(&config, &linux(), &options, &deps, &mut stderr).expect("run succeeds");
    assert_eq!(outcome.release.tag(), "v0.4.2");
}

#[test]
fn download_404_is_terminal_and_cleans_the_workspace() {
    let (_temp, config) = test_config();
    let index = untouched_index();
    let seen_dir = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&seen_dir);
    let mut downloader = MockAssetDownloader::new();
    downloader.expect_download().returning(move |spec, dest| {
        *seen.lock().expect("seen lock") = dest.parent().map(camino::Utf8Path::to_owned);
        Err(crate::http::HttpError::NotFound {
            url: spec.download_url.clone(),
        })
    });
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().times(0);
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: Some("v9.9.9".to_owned()),
        quiet: true,
    };

    let mut stderr = Vec::new();
    let err = run_with_platform(&config, &linux(), &options, &deps, &mut stderr)
        .expect_err("404 is terminal");

    assert!(matches!(err, InstallerError::DownloadFailed { .. }));
    let msg = err.to_string();
    assert!(msg.contains("/v9.9.9/"));
    assert!(msg.contains("may not exist"));

    let workspace_root = seen_dir
        .lock()
        .expect("seen lock")
        .clone()
        .expect("downloader ran");
    assert!(!workspace_root.as_std_path().exists());
}

#[test]
fn extraction_failure_is_archive_corrupt() {
    let (_temp, config) = test_config();
    let index = untouched_index();
    let seen_dir = Arc::new(Mutex::new(None));
    let downloader = recording_downloader(&seen_dir);
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .returning(|_, _| Err(crate::extraction::ExtractionError::NoFiles));
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: Some("v0.1.0".to_owned()),
        quiet: true,
    };

    let mut stderr = Vec::new();
    let err = run_with_platform(&config, &linux(), &options, &deps, &mut stderr)
        .expect_err("corrupt archive");
    assert!(matches!(err, InstallerError::ArchiveCorrupt { .. }));
}

#[test]
fn missing_binary_after_extraction_is_binary_not_found() {
    let (_temp, config) = test_config();
    let index = untouched_index();
    let seen_dir = Arc::new(Mutex::new(None));
    let downloader = recording_downloader(&seen_dir);
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().returning(|_, dest_dir| {
        std::fs::write(dest_dir.join("CHANGELOG.md"), b"notes")?;
        Ok(vec!["CHANGELOG.md".to_owned()])
    });
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: Some("v0.1.0".to_owned()),
        quiet: true,
    };

    let mut stderr = Vec::new();
    let err = run_with_platform(&config, &linux(), &options, &deps, &mut stderr)
        .expect_err("no binary in archive");
    assert!(matches!(err, InstallerError::BinaryNotFound { .. }));
    assert!(err.to_string().contains("CHANGELOG.md"));
}

#[test]
fn invalid_format_aborts_before_install() {
    let (_temp, config) = test_config();
    let index = untouched_index();
    let seen_dir = Arc::new(Mutex::new(None));
    let downloader = recording_downloader(&seen_dir);
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().returning(|_, dest_dir| {
        std::fs::write(dest_dir.join("senterm"), b"not an executable at all")?;
        Ok(vec!["senterm".to_owned()])
    });
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: Some("v0.1.0".to_owned()),
        quiet: true,
    };

    let mut stderr = Vec::new();
    let err = run_with_platform(&config, &linux(), &options, &deps, &mut stderr)
        .expect_err("invalid format");
    assert!(matches!(err, InstallerError::InvalidBinaryFormat { .. }));
    assert!(
        !config.install_dir.join("sen").as_std_path().exists(),
        "no install may happen after a failed format check"
    );
}

#[test]
fn progress_lines_cover_each_stage() {
    let (_temp, config) = test_config();
    let index = untouched_index();
    let seen_dir = Arc::new(Mutex::new(None));
    let downloader = recording_downloader(&seen_dir);
    let extractor = planting_extractor();
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: Some("v0.1.0".to_owned()),
        quiet: false,
    };

    let mut stderr = Vec::new();
    run_with_platform(&config, &linux(), &options, &deps, &mut stderr).expect("run succeeds");

    let text = String::from_utf8(stderr).expect("stderr is UTF-8");
    assert!(text.contains("Installing senterm for linux/x86_64"));
    assert!(text.contains("Installing version v0.1.0."));
    assert!(text.contains("Downloading senterm-linux-x86_64.tar.gz"));
    assert!(text.contains("Extracting archive"));
    assert!(text.contains("Verified ELF executable."));
    assert!(text.contains("Installing to"));
}

#[test]
fn quiet_run_with_resolvable_command_is_silent() {
    let (_temp, config) = test_config();
    let index = untouched_index();
    let seen_dir = Arc::new(Mutex::new(None));
    let downloader = recording_downloader(&seen_dir);
    let extractor = planting_extractor();
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: Some("v0.1.0".to_owned()),
        quiet: true,
    };

    // Put the install directory on PATH so the soft-failure warning
    // does not fire.
    let outcome = temp_env::with_var(
        "PATH",
        Some(config.install_dir.as_str()),
        || {
            let mut stderr = Vec::new();
            let outcome = run_with_platform(&config, &linux(), &options, &deps, &mut stderr)
                .expect("run succeeds");
            assert!(stderr.is_empty(), "quiet run should print nothing");
            outcome
        },
    );
    assert!(outcome.command_on_path);
}

#[test]
fn unresolvable_command_is_a_warning_not_an_error() {
    let (_temp, config) = test_config();
    let index = untouched_index();
    let seen_dir = Arc::new(Mutex::new(None));
    let downloader = recording_downloader(&seen_dir);
    let extractor = planting_extractor();
    let executor = ScriptedExecutor::new();
    let deps = PipelineDeps {
        index: &index,
        downloader: &downloader,
        extractor: &extractor,
        executor: &executor,
    };
    let options = RunOptions {
        tag: Some("v0.1.0".to_owned()),
        quiet: true,
    };

    let outcome = temp_env::with_var("PATH", None::<&str>, || {
        let mut stderr = Vec::new();
        let outcome = run_with_platform(&config, &linux(), &options, &deps, &mut stderr)
            .expect("soft failure still succeeds");
        let text = String::from_utf8(stderr).expect("stderr is UTF-8");
        assert!(text.contains("does not resolve on your PATH"));
        assert!(text.contains("export PATH="));
        outcome
    });
    assert!(!outcome.command_on_path);
}
