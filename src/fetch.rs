//! Artefact download abstraction.
//!
//! A trait seam over the HTTP download so tests can drive the pipeline
//! without network access. The production implementation streams the
//! release asset into the workspace.

use crate::asset::AssetSpec;
use crate::http::{self, HttpError};
use camino::Utf8Path;

/// Trait for downloading a release asset, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait AssetDownloader {
    /// Download the asset described by `spec` to `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the asset is missing
    /// (404), or the file cannot be written.
    fn download(&self, spec: &AssetSpec, dest: &Utf8Path) -> Result<(), HttpError>;
}

/// HTTP-based downloader using the shared agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpAssetDownloader;

impl AssetDownloader for HttpAssetDownloader {
    fn download(&self, spec: &AssetSpec, dest: &Utf8Path) -> Result<(), HttpError> {
        http::get_to_file(&spec.download_url, dest.as_std_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstallerConfig;
    use crate::platform::Platform;
    use crate::release::ReleaseRef;

    #[test]
    fn mock_downloader_receives_the_derived_spec() {
        let config = InstallerConfig::default();
        let platform = Platform::from_os_arch("linux", "x86_64").expect("supported");
        let spec = AssetSpec::derive(&config, &platform, &ReleaseRef::new("v0.1.0"));

        let mut downloader = MockAssetDownloader::new();
        downloader
            .expect_download()
            .withf(|spec, _| spec.filename == "senterm-linux-x86_64.tar.gz")
            .return_once(|_, _| Ok(()));

        let dest = Utf8Path::new("/tmp/ws/senterm-linux-x86_64.tar.gz");
        downloader.download(&spec, dest).expect("download");
    }
}
