//! Deterministic artefact naming.
//!
//! The asset filename is a pure function of the platform and the
//! project's naming convention; the release version only changes the
//! directory segment of the download URL. The same derivation therefore
//! works for every historical release.

use crate::config::InstallerConfig;
use crate::platform::Platform;
use crate::release::ReleaseRef;

/// The expected remote artefact for one platform and release.
///
/// # Examples
///
/// ```
/// use senterm_installer::asset::AssetSpec;
/// use senterm_installer::config::InstallerConfig;
/// use senterm_installer::platform::Platform;
/// use senterm_installer::release::ReleaseRef;
///
/// let config = InstallerConfig::default();
/// let platform = Platform::from_os_arch("linux", "x86_64").expect("supported");
/// let spec = AssetSpec::derive(&config, &platform, &ReleaseRef::new("v0.1.0"));
/// assert_eq!(spec.filename, "senterm-linux-x86_64.tar.gz");
/// assert!(spec.download_url.contains("/v0.1.0/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    /// The asset filename, fixed per platform.
    pub filename: String,
    /// The full download URL for this release.
    pub download_url: String,
}

impl AssetSpec {
    /// Derive the asset spec for a platform and release.
    #[must_use]
    pub fn derive(config: &InstallerConfig, platform: &Platform, release: &ReleaseRef) -> Self {
        let filename = asset_filename(config, platform);
        let download_url = config.asset_download_url(release.tag(), &filename);
        Self {
            filename,
            download_url,
        }
    }
}

/// The asset filename for a platform.
///
/// Pure in the platform: two releases share the same filename and
/// differ only in the URL's version segment.
#[must_use]
pub fn asset_filename(config: &InstallerConfig, platform: &Platform) -> String {
    format!(
        "{}-{}.tar.gz",
        config.binary_name,
        platform.asset_suffix()
    )
}
