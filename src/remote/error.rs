//! Error types for the remote endpoint clients.

use thiserror::Error;

/// Result type for remote endpoint calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors that can occur talking to a hosted endpoint.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never completed (DNS, connect, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body was not valid JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response parsed but did not carry the promised field.
    #[error("response from {url} is missing the `{field}` field")]
    MissingField { url: String, field: &'static str },
}

impl RemoteError {
    /// True when the endpoint answered but broke its contract, as opposed
    /// to the request failing in transit.
    pub fn is_contract_error(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::Decode { .. })
    }
}
