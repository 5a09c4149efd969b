//! Archive extraction for downloaded release assets.
//!
//! Release assets are `.tar.gz`. Every entry is confined to the
//! destination directory twice over: entry paths and link targets are
//! screened up front for absolute paths and parent-directory
//! components, and unpacking goes through tar's containment-checked
//! `unpack_in`, which also refuses writes that resolve through a
//! symlinked parent. An archive yielding no regular files is treated
//! as corrupt.

use std::io::Read;
use std::path::{Component, Path};

/// Trait for extracting release archives, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the names of the regular files that were extracted.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::OutsideDestination`] if any entry
    /// path or link target could land outside `dest_dir`.
    /// Returns [`ExtractionError::NoFiles`] if the archive contains no
    /// regular files.
    /// Returns [`ExtractionError::Io`] on I/O failures, including a
    /// stream that is not valid gzip.
    fn extract(&self, archive_path: &Path, dest_dir: &Path)
    -> Result<Vec<String>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The archive stream could not be read or decompressed.
    #[error("could not read the archive stream: {0}")]
    Io(#[from] std::io::Error),

    /// An entry path or link target points outside the extraction
    /// directory.
    #[error("entry {path} points outside the extraction directory")]
    OutsideDestination {
        /// The offending path or link target.
        path: String,
    },

    /// The archive holds no regular files.
    #[error("archive contains no files")]
    NoFiles,
}

/// Default extractor using the `flate2` and `tar` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipExtractor;

impl ArchiveExtractor for GzipExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<String>, ExtractionError> {
        let file = std::fs::File::open(archive_path)?;
        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
        let mut extracted = Vec::new();

        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            let file_name = screen_entry(&entry)?;

            // unpack_in re-checks containment against the destination,
            // resolving symlinked parents; a skipped entry failed that
            // check.
            if !entry.unpack_in(dest_dir)? {
                return Err(escape(&entry.path()?));
            }

            if let Some(name) = file_name {
                extracted.push(name);
            }
        }

        if extracted.is_empty() {
            return Err(ExtractionError::NoFiles);
        }
        Ok(extracted)
    }
}

/// Screen one entry before unpacking.
///
/// Rejects escaping entry paths, and for link entries (symbolic or
/// hard) rejects escaping link targets too. Returns the file name when
/// the entry is a regular file.
fn screen_entry<R: Read>(entry: &tar::Entry<'_, R>) -> Result<Option<String>, ExtractionError> {
    let path = entry.path()?.into_owned();
    confine(&path)?;
    if let Some(target) = entry.link_name()? {
        confine(&target)?;
    }

    if entry.header().entry_type().is_file() {
        Ok(path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()))
    } else {
        Ok(None)
    }
}

/// Reject a path that is absolute or climbs out via `..`.
fn confine(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|component| matches!(component, Component::ParentDir));
    if escapes { Err(escape(path)) } else { Ok(()) }
}

fn escape(path: &Path) -> ExtractionError {
    ExtractionError::OutsideDestination {
        path: path.display().to_string(),
    }
}
