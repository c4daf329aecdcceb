//! Transport-level errors raised by the API client

use thiserror::Error;

/// Errors that prevent a normalized response from being produced.
///
/// Backend-reported failures are not errors: they come back as an
/// [`ApiResponse`](crate::ApiResponse) with `success == false`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Connection refused, DNS failure, reset, ...
    #[error("Network error: {0}")]
    Network(String),

    /// A successful response whose body is not JSON
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// The envelope's `data` does not match the expected type
    #[error("Unexpected response data: {0}")]
    Decode(String),

    /// A request payload could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// The request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl ClientError {
    /// Map a reqwest failure onto the client taxonomy
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::InvalidBody(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_is_distinguishable() {
        assert_eq!(ClientError::Timeout.to_string(), "Request timeout");
        assert!(ClientError::Timeout.is_timeout());
        assert!(!ClientError::Network("refused".into()).is_timeout());
    }
}
