//! Error types for REST API operations

use btcmarkets_auth::AuthError;
use btcmarkets_types::AmountError;

use crate::rate_gate::RateGateError;
use crate::transport::TransportError;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    Auth(#[from] AuthError),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// No permit could be obtained from the rate gate
    #[error("Rate gate: {0}")]
    RateGate(#[from] RateGateError),

    /// Network or transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx response that did not carry a logical failure payload
    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {source}")]
    Decode {
        /// Underlying decode error
        source: serde_json::Error,
        /// Raw response body
        body: String,
    },

    /// Request body could not be serialized
    #[error("Failed to encode request: {0}")]
    Encode(serde_json::Error),

    /// Exchange answered with `success: false`
    #[error("Exchange error: {message}")]
    Exchange {
        /// `errorCode` as reported
        code: Option<i64>,
        /// `errorMessage` as reported
        message: String,
        /// HTTP status the failure arrived with
        status: u16,
    },

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Amount conversion failed
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RestError {
    /// Check if the exchange rejected the request
    pub fn is_exchange_failure(&self) -> bool {
        matches!(self, Self::Exchange { .. })
    }

    /// The exchange's own error message, if this is a logical failure
    pub fn exchange_message(&self) -> Option<&str> {
        match self {
            Self::Exchange { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Check if this error is a timeout (transport or permit wait)
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport(TransportError::Timeout(_)) | Self::RateGate(RateGateError::Timeout(_))
        )
    }

    /// Check if repeating the same call could succeed
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::RateGate(err) => {
                matches!(err, RateGateError::Timeout(_) | RateGateError::Exhausted)
            }
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_exchange_failure_accessors() {
        let err = RestError::Exchange {
            code: Some(3),
            message: "insufficient funds".to_string(),
            status: 200,
        };
        assert!(err.is_exchange_failure());
        assert_eq!(err.exchange_message(), Some("insufficient funds"));
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Exchange error: insufficient funds");

        assert_eq!(RestError::AuthRequired.exchange_message(), None);
    }

    #[test]
    fn test_timeout_detection() {
        let transport = RestError::from(TransportError::Timeout(Duration::from_secs(10)));
        assert!(transport.is_timeout());
        assert!(transport.is_retryable());

        let gate = RestError::from(RateGateError::Timeout(Duration::from_millis(50)));
        assert!(gate.is_timeout());

        assert!(!RestError::from(RateGateError::Closed).is_timeout());
        assert!(!RestError::from(RateGateError::Closed).is_retryable());
    }

    #[test]
    fn test_http_status_retryable() {
        let unavailable = RestError::HttpStatus {
            status: 503,
            body: String::new(),
        };
        assert!(unavailable.is_retryable());

        let forbidden = RestError::HttpStatus {
            status: 403,
            body: String::new(),
        };
        assert!(!forbidden.is_retryable());
    }

    #[test]
    fn test_from_auth_error() {
        let err = RestError::from(AuthError::MissingApiKey);
        assert!(matches!(err, RestError::Auth(AuthError::MissingApiKey)));
        assert!(!err.is_retryable());
    }
}
