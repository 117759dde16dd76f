//! Transport-level failures of a routing provider.

use thiserror::Error;

/// Errors raised while talking to a routing provider.
///
/// These describe transport failures. A reply that arrived but carries a
/// non-OK service status is not a `ProviderError`; the caller inspects the
/// status itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The caller cancelled the request before it completed.
    #[error("routing request was cancelled")]
    Cancelled,
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL with the query string removed.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The service answered with an unsuccessful HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Request URL with the query string removed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Reason phrase or body excerpt.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Request URL with the query string removed.
        url: String,
        /// Description of the failure.
        message: String,
    },
    /// The reply body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Description of the decoding failure.
        message: String,
    },
}
