//! Error types for the proxy-config-board crate.

use http::StatusCode;
use thiserror::Error;

/// Error returned when fetching a page through the relay fails.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The address the user entered is not an absolute URL.
    #[error("invalid address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },
    /// The relay endpoint itself is misconfigured.
    #[error("invalid relay endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    /// The relay answered with a non-2xx status.
    #[error("{status}: {reason}")]
    Upstream { status: StatusCode, reason: String },
    /// The relay could not be reached.
    #[error("{0}")]
    Transport(#[from] reqwest_middleware::Error),
    /// The relay response body could not be read.
    #[error("failed to read relay response: {0}")]
    Body(#[source] reqwest::Error),
}

/// Error returned by a clipboard port.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The platform refused clipboard access.
    #[error("clipboard access denied: {0}")]
    PermissionDenied(String),
    /// No clipboard is available, or it holds no text.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Recoverable failure of a user action.
///
/// Every variant is reported to the user as a notice; none is fatal.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Please enter a URL.")]
    EmptyAddress,
    #[error("No valid configurations found in clipboard.")]
    NoClipboardConfigs,
    #[error("Could not identify any known protocols.")]
    NoKnownProtocols,
    #[error("No valid configuration links found on that page.")]
    NoPageLinks,
    #[error("No configurations to test.")]
    NothingToTest,
    #[error("No such item in the list.")]
    UnknownItem,
    #[error("The list changed before the fetch completed; results discarded.")]
    Superseded,
    #[error("Error: {0}")]
    Relay(#[from] RelayError),
    #[error("Could not access clipboard: {0}")]
    Clipboard(#[source] ClipboardError),
    #[error("Failed to copy {what}: {source}")]
    Copy {
        what: &'static str,
        #[source]
        source: ClipboardError,
    },
}

impl IngestError {
    /// Whether this is informational rather than a failure.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            IngestError::NoPageLinks | IngestError::NothingToTest | IngestError::Superseded
        )
    }
}

/// Error returned when a board cannot be constructed.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid classifier pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Relay(#[from] RelayError),
}
