//! Installer configuration.
//!
//! All fixed names and paths live in a single value constructed once at
//! startup and passed to every stage. No component reads ambient global
//! state.

use camino::Utf8PathBuf;

/// Fixed configuration for one installer run.
///
/// The defaults describe the senterm project: the release archives
/// contain a binary named `senterm`, and the installer always installs
/// it under the command name `sen`.
///
/// # Examples
///
/// ```
/// use senterm_installer::config::InstallerConfig;
///
/// let config = InstallerConfig::default();
/// assert_eq!(config.binary_name, "senterm");
/// assert_eq!(config.command_name, "sen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Name of the binary inside the release archive.
    pub binary_name: String,
    /// Name the binary is installed under. Always distinct from
    /// `binary_name`; installation is a rename-on-install.
    pub command_name: String,
    /// System-wide install directory.
    pub install_dir: Utf8PathBuf,
    /// GitHub repository owner.
    pub repo_owner: String,
    /// GitHub repository name.
    pub repo_name: String,
}

impl InstallerConfig {
    /// URL of the latest-release query on the remote index.
    #[must_use]
    pub fn latest_release_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/releases/latest",
            self.repo_owner, self.repo_name
        )
    }

    /// Download URL for a release asset.
    ///
    /// The version tag only changes the directory segment of the URL;
    /// the asset filename is fixed per platform.
    #[must_use]
    pub fn asset_download_url(&self, tag: &str, filename: &str) -> String {
        format!(
            "https://github.com/{}/{}/releases/download/{tag}/{filename}",
            self.repo_owner, self.repo_name
        )
    }

    /// Full path the binary is installed to.
    #[must_use]
    pub fn install_path(&self) -> Utf8PathBuf {
        self.install_dir.join(&self.command_name)
    }
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            binary_name: "senterm".to_owned(),
            command_name: "sen".to_owned(),
            install_dir: Utf8PathBuf::from("/usr/local/bin"),
            repo_owner: "senterm-dev".to_owned(),
            repo_name: "senterm".to_owned(),
        }
    }
}
