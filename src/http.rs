//! Shared HTTP agent and request helpers.
//!
//! Both the release index query and the artefact download go through a
//! single `ureq` agent with a global request timeout. 404 responses are
//! mapped to a distinct variant so callers can phrase guidance about
//! missing versions versus transport failures.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for index queries and artefact downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors arising from HTTP operations.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The request failed for any other reason.
    #[error("request failed for {url}: {reason}")]
    RequestFailed {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// I/O error writing the response body.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetch a URL and return the body as a string.
///
/// # Errors
///
/// Returns [`HttpError::NotFound`] on 404, [`HttpError::RequestFailed`]
/// on any other transport or status failure.
pub fn get_text(url: &str) -> Result<String, HttpError> {
    let response = agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    response
        .into_body()
        .read_to_string()
        .map_err(|e| HttpError::RequestFailed {
            url: url.to_owned(),
            reason: e.to_string(),
        })
}

/// Fetch a URL and write the body to a file.
///
/// # Errors
///
/// Returns [`HttpError::NotFound`] on 404, [`HttpError::RequestFailed`]
/// on other request failures, and [`HttpError::Io`] if the file cannot
/// be written.
pub fn get_to_file(url: &str, dest: &Path) -> Result<(), HttpError> {
    let response = agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    let mut file = std::fs::File::create(dest)?;
    std::io::copy(&mut response.into_body().as_reader(), &mut file).map_err(HttpError::Io)?;
    Ok(())
}

/// Shared `ureq` agent with request timeout configuration.
fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to an [`HttpError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> HttpError {
    match err {
        ureq::Error::StatusCode(404) => HttpError::NotFound {
            url: url.to_owned(),
        },
        other => HttpError::RequestFailed {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
