//! Error types for credential handling

/// Errors that can occur while building credentials
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// API key is empty
    #[error("API key must not be empty")]
    MissingApiKey,

    /// API secret is empty
    #[error("API secret must not be empty")]
    MissingSecret,

    /// API secret is not valid base64
    #[error("Invalid base64 API secret: {0}")]
    InvalidSecret(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
