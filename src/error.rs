//! Error types for the senterm installer.
//!
//! This module defines semantic error variants for every terminal
//! failure in the installation pipeline. Each message carries
//! actionable guidance: how to pin a version, where to check the
//! release listing, or what the workspace actually contained.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during the installation process.
///
/// Every variant is terminal for the run; the pipeline performs no
/// retries. The only recoverable condition after a successful install
/// (the command not resolving on `PATH`) is modelled as a warning
/// outcome, not an error.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The host OS or architecture is outside the supported set.
    #[error(
        "unsupported platform: {os}/{arch}; senterm ships prebuilt binaries for \
         macOS (any architecture) and Linux x86_64 only"
    )]
    UnsupportedPlatform {
        /// The detected operating system.
        os: String,
        /// The detected CPU architecture.
        arch: String,
    },

    /// No release tag could be resolved from the remote index.
    #[error(
        "could not determine the latest version: {reason}; either no releases \
         are published yet, or the GitHub API rate limit was hit. Pass \
         --tag <TAG> to install a specific version"
    )]
    VersionResolutionFailed {
        /// Description of why resolution failed.
        reason: String,
    },

    /// The artefact download failed.
    #[error(
        "download failed for {url}: {reason}; the version may not exist, or \
         its assets may not have been uploaded yet. Check the releases page \
         for published versions"
    )]
    DownloadFailed {
        /// The URL that was requested.
        url: String,
        /// Description of the failure.
        reason: String,
    },

    /// The downloaded archive could not be extracted.
    #[error("archive {path} is corrupt or not a valid tar.gz: {reason}")]
    ArchiveCorrupt {
        /// Path to the downloaded archive.
        path: Utf8PathBuf,
        /// Description of the extraction failure.
        reason: String,
    },

    /// No binary matching the expected name was found in the workspace.
    #[error(
        "binary {binary_name} not found in the extracted archive; workspace \
         contents:\n{listing}"
    )]
    BinaryNotFound {
        /// The binary filename that was searched for.
        binary_name: String,
        /// A listing of the workspace contents for diagnosis.
        listing: String,
    },

    /// More than one file matched the binary name during the recursive
    /// fallback search.
    #[error(
        "found {} files named {binary_name} in the archive; refusing to pick \
         one arbitrarily:\n{}",
        candidates.len(),
        format_candidates(candidates)
    )]
    AmbiguousBinary {
        /// The binary filename that was searched for.
        binary_name: String,
        /// Every path that matched.
        candidates: Vec<Utf8PathBuf>,
    },

    /// The located file is not a valid executable for the host OS.
    #[error(
        "{path} is not a valid {expected} executable (magic bytes {found}); \
         the download may be corrupt or intended for a different platform"
    )]
    InvalidBinaryFormat {
        /// Path to the rejected file.
        path: Utf8PathBuf,
        /// The binary format expected for the host OS.
        expected: &'static str,
        /// Hex rendering of the observed magic bytes.
        found: String,
    },

    /// Writing to the install directory failed even with elevated
    /// privileges.
    #[error(
        "could not install to {path}: {reason}; check that the directory is \
         writable or that sudo is available"
    )]
    InstallWriteFailed {
        /// The install path that could not be written.
        path: Utf8PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;

fn format_candidates(candidates: &[Utf8PathBuf]) -> String {
    candidates
        .iter()
        .map(|path| format!("  {path}"))
        .collect::<Vec<_>>()
        .join("\n")
}
