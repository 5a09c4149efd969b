//! Host platform detection.
//!
//! Determines the operating system family and CPU architecture of the
//! host and validates the pair against the supported set. Detection is
//! pure given the host environment and performs no I/O.

use crate::error::{InstallerError, Result};
use std::fmt;

/// Supported operating system families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    /// Linux (x86_64 artefact only).
    Linux,
    /// macOS (universal artefact, any architecture).
    MacOs,
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
        }
    }
}

/// A validated host platform.
///
/// Construction goes through [`Platform::detect`] (host environment) or
/// [`Platform::from_os_arch`] (explicit pair, used by tests and the
/// dry-run path). Unsupported pairs are rejected at construction time,
/// before any network or filesystem activity.
///
/// # Examples
///
/// ```
/// use senterm_installer::platform::{HostOs, Platform};
///
/// let platform = Platform::from_os_arch("linux", "x86_64").expect("supported");
/// assert_eq!(platform.os(), HostOs::Linux);
/// assert!(Platform::from_os_arch("linux", "aarch64").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os: HostOs,
    arch: String,
}

impl Platform {
    /// Detect the platform of the running host.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] when the host OS
    /// is neither Linux nor macOS, or the architecture is outside the
    /// supported set for that OS.
    pub fn detect() -> Result<Self> {
        Self::from_os_arch(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Validate an explicit OS/architecture pair.
    ///
    /// The Linux artefact exists for x86_64 only; the macOS artefact is
    /// a fat (universal) binary, so any architecture is accepted there.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] for any pair
    /// outside the supported set.
    pub fn from_os_arch(os: &str, arch: &str) -> Result<Self> {
        let host_os = match os {
            "linux" => HostOs::Linux,
            "macos" => HostOs::MacOs,
            _ => {
                return Err(unsupported(os, arch));
            }
        };
        if host_os == HostOs::Linux && arch != "x86_64" {
            return Err(unsupported(os, arch));
        }
        Ok(Self {
            os: host_os,
            arch: arch.to_owned(),
        })
    }

    /// The operating system family.
    #[must_use]
    pub fn os(&self) -> HostOs {
        self.os
    }

    /// The CPU architecture string as reported by the host.
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// The platform segment of the artefact filename.
    ///
    /// This depends only on the platform, never on the release version:
    /// the same installer logic works for every historical release.
    #[must_use]
    pub fn asset_suffix(&self) -> &'static str {
        match self.os {
            HostOs::Linux => "linux-x86_64",
            HostOs::MacOs => "macos-universal",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

fn unsupported(os: &str, arch: &str) -> InstallerError {
    InstallerError::UnsupportedPlatform {
        os: os.to_owned(),
        arch: arch.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::linux_x86("linux", "x86_64", HostOs::Linux)]
    #[case::macos_arm("macos", "aarch64", HostOs::MacOs)]
    #[case::macos_x86("macos", "x86_64", HostOs::MacOs)]
    fn accepts_supported_pairs(#[case] os: &str, #[case] arch: &str, #[case] expected: HostOs) {
        let platform = Platform::from_os_arch(os, arch).expect("supported pair");
        assert_eq!(platform.os(), expected);
        assert_eq!(platform.arch(), arch);
    }

    #[rstest]
    #[case::linux_arm("linux", "aarch64")]
    #[case::linux_riscv("linux", "riscv64")]
    #[case::windows("windows", "x86_64")]
    #[case::freebsd("freebsd", "x86_64")]
    fn rejects_unsupported_pairs(#[case] os: &str, #[case] arch: &str) {
        let err = Platform::from_os_arch(os, arch).expect_err("unsupported pair");
        assert!(
            matches!(err, InstallerError::UnsupportedPlatform { .. }),
            "expected UnsupportedPlatform, got {err:?}"
        );
    }

    #[rstest]
    #[case::linux("linux", "x86_64", "linux-x86_64")]
    #[case::macos_arm("macos", "aarch64", "macos-universal")]
    #[case::macos_x86("macos", "x86_64", "macos-universal")]
    fn asset_suffix_depends_on_os_only(
        #[case] os: &str,
        #[case] arch: &str,
        #[case] expected: &str,
    ) {
        let platform = Platform::from_os_arch(os, arch).expect("supported pair");
        assert_eq!(platform.asset_suffix(), expected);
    }

    #[test]
    fn display_shows_os_and_arch() {
        let platform = Platform::from_os_arch("macos", "aarch64").expect("supported");
        assert_eq!(format!("{platform}"), "macos/aarch64");
    }
}
