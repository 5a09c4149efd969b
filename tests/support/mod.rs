//! Shared fixtures for the behaviour tests.

use camino::Utf8Path;
use flate2::Compression;
use flate2::write::GzEncoder;
use senterm_installer::config::InstallerConfig;
use senterm_installer::fetch::AssetDownloader;
use senterm_installer::http::HttpError;
use senterm_installer::release::ReleaseIndex;

/// Build a gzipped tar archive in memory from `(path, bytes, mode)`
/// entries.
///
/// # Panics
///
/// Panics on archive construction failure; fixtures are infallible in
/// practice.
#[must_use]
pub fn build_tar_gz(entries: &[(&str, &[u8], u32)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, bytes, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(*mode);
        // Write the name bytes directly: `set_path`/`append_data`
        // refuse `..` components, but some fixtures need hostile
        // archives containing exactly those paths.
        header.as_gnu_mut().expect("gnu header").name[..path.len()]
            .copy_from_slice(path.as_bytes());
        header.set_cksum();
        builder.append(&header, *bytes).expect("append archive entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

/// A downloader that writes a fixed archive instead of touching the
/// network.
pub struct CannedDownloader {
    archive: Vec<u8>,
}

impl CannedDownloader {
    #[must_use]
    pub fn new(archive: Vec<u8>) -> Self {
        Self { archive }
    }
}

impl AssetDownloader for CannedDownloader {
    fn download(
        &self,
        _spec: &senterm_installer::asset::AssetSpec,
        dest: &Utf8Path,
    ) -> std::result::Result<(), HttpError> {
        std::fs::write(dest, &self.archive).map_err(HttpError::Io)
    }
}

/// A downloader that reports every asset as missing.
pub struct MissingAssetDownloader;

impl AssetDownloader for MissingAssetDownloader {
    fn download(
        &self,
        spec: &senterm_installer::asset::AssetSpec,
        _dest: &Utf8Path,
    ) -> std::result::Result<(), HttpError> {
        Err(HttpError::NotFound {
            url: spec.download_url.clone(),
        })
    }
}

/// A release index serving a canned response body.
pub struct CannedIndex {
    body: String,
}

impl CannedIndex {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl ReleaseIndex for CannedIndex {
    fn latest_release_body(
        &self,
        _config: &InstallerConfig,
    ) -> std::result::Result<String, HttpError> {
        Ok(self.body.clone())
    }
}

/// A release index that must never be queried.
pub struct PanickingIndex;

impl ReleaseIndex for PanickingIndex {
    fn latest_release_body(
        &self,
        _config: &InstallerConfig,
    ) -> std::result::Result<String, HttpError> {
        panic!("the release index must not be queried in this scenario");
    }
}

