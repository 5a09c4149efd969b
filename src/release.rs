//! Release tag resolution.
//!
//! An explicit tag from the caller is used verbatim; its existence is
//! discovered at download time, not checked here. Without an explicit
//! tag, the remote release index is queried for the latest published
//! tag. The index response is treated as semi-structured text: the
//! first `tag_name` field is extracted without a schema dependency, so
//! field reordering or additions upstream cannot break resolution.

use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::http::{self, HttpError};
use std::fmt;

/// An immutable release tag identifying the version to install.
///
/// # Examples
///
/// ```
/// use senterm_installer::release::ReleaseRef;
///
/// let release = ReleaseRef::new("v0.1.0");
/// assert_eq!(release.tag(), "v0.1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRef(String);

impl ReleaseRef {
    /// Wrap a tag string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag as a string slice.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for querying the remote release index, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseIndex {
    /// Fetch the raw latest-release response body for the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the resource is missing.
    fn latest_release_body(&self, config: &InstallerConfig) -> std::result::Result<String, HttpError>;
}

/// Production release index backed by the GitHub releases API.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubReleaseIndex;

impl ReleaseIndex for GithubReleaseIndex {
    fn latest_release_body(&self, config: &InstallerConfig) -> std::result::Result<String, HttpError> {
        http::get_text(&config.latest_release_url())
    }
}

/// Resolve the release to install.
///
/// An explicit tag wins unconditionally and triggers no network
/// activity. Otherwise the index is queried once; there are no retries.
///
/// # Errors
///
/// Returns [`InstallerError::VersionResolutionFailed`] when no explicit
/// tag was given and the index query fails or yields no tag field.
pub fn resolve(
    explicit_tag: Option<&str>,
    index: &dyn ReleaseIndex,
    config: &InstallerConfig,
) -> Result<ReleaseRef> {
    if let Some(tag) = explicit_tag {
        return Ok(ReleaseRef::new(tag));
    }

    let body = index
        .latest_release_body(config)
        .map_err(|e| InstallerError::VersionResolutionFailed {
            reason: e.to_string(),
        })?;

    extract_tag_name(&body)
        .map(ReleaseRef::new)
        .ok_or_else(|| InstallerError::VersionResolutionFailed {
            reason: "no tag_name field in the release index response".to_owned(),
        })
}

/// Extract the first `tag_name` string value from JSON-like text.
///
/// Tolerates whitespace variations and ignores everything else in the
/// payload. Returns `None` when the field is absent or empty.
fn extract_tag_name(body: &str) -> Option<String> {
    let key_end = body.find("\"tag_name\"")? + "\"tag_name\"".len();
    let rest = body.get(key_end..)?;
    let after_colon = rest.get(rest.find(':')? + 1..)?;
    let after_quote = after_colon.get(after_colon.find('"')? + 1..)?;
    let value = after_quote.get(..after_quote.find('"')?)?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
