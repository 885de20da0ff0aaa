//! Error types for page-harvest.
//!
//! Parsing never fails as a whole: problems with a single tag are reported as
//! [`ExtractError`] values inside an extraction batch. Only the fetch and
//! download collaborators return [`HarvestError`].

use thiserror::Error;

/// Errors surfaced by the I/O collaborators and configuration loading.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP status {status} for {url}")]
    Status {
        /// Status code returned by the server.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// Could not open a WebDriver session.
    #[error("WebDriver session error: {0}")]
    WebDriverSession(#[from] fantoccini::error::NewSessionError),

    /// A WebDriver command failed.
    #[error("WebDriver command error: {0}")]
    WebDriverCommand(#[from] fantoccini::error::CmdError),

    /// No WebDriver server answered at the configured or fallback URLs.
    #[error("no WebDriver server reachable (tried {0})")]
    WebDriverUnavailable(String),

    /// Rendering a page took longer than allowed.
    #[error("timed out after {secs}s loading {url}")]
    Timeout { url: String, secs: u64 },

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be read or written (configuration files, CLI output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL could not be parsed or resolved.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
}

/// Result type alias for collaborator operations.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Why a single tag instance was skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The attribute text contains an odd number of double quotes, so at
    /// least one value never terminates.
    #[error("unbalanced quotes in attribute text `{0}`")]
    UnbalancedQuotes(String),
}
