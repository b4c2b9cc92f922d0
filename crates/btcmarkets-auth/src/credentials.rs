//! API credentials for BTC Markets
//!
//! Implements HMAC-SHA512 signing as required by BTC Markets' private endpoints.
//!
//! # Security
//!
//! The decoded secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::Sha512;
use tracing::trace;

use crate::error::{AuthError, AuthResult};

type HmacSha512 = Hmac<Sha512>;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "BTCMARKETS_API_KEY";

/// Environment variable holding the base64 API secret
pub const API_SECRET_ENV: &str = "BTCMARKETS_API_SECRET";

/// Build the exact byte sequence that gets signed for a request
///
/// `body` is the serialized JSON body as transmitted, or the empty string
/// for GET requests.
pub fn canonical_message(path: &str, timestamp: i64, body: &str) -> String {
    format!("{}\n{}\n{}", path, timestamp, body)
}

/// Milliseconds since the Unix epoch, as expected by the `timestamp` header
pub fn timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// API credentials for authenticated requests
///
/// The secret is automatically zeroized when the Credentials are dropped,
/// preventing sensitive data from remaining in memory.
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// Secret (decoded from base64, zeroized on drop)
    secret: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create new credentials from API key and secret
    ///
    /// # Arguments
    /// * `api_key` - Your BTC Markets API key
    /// * `secret` - Your private key, base64 encoded as issued by BTC Markets
    ///
    /// # Returns
    /// Error if either value is empty or the secret is not valid base64
    pub fn new(api_key: impl Into<String>, secret: impl AsRef<str>) -> AuthResult<Self> {
        let api_key = api_key.into();
        let secret = secret.as_ref();

        if api_key.trim().is_empty() {
            return Err(AuthError::MissingApiKey);
        }
        if secret.trim().is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let decoded = BASE64
            .decode(secret)
            .map_err(|e| AuthError::InvalidSecret(e.to_string()))?;

        Ok(Self {
            api_key,
            secret: SecretBox::new(Box::new(decoded)),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `BTCMARKETS_API_KEY` and `BTCMARKETS_API_SECRET` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let secret = std::env::var(API_SECRET_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_SECRET_ENV.to_string()))?;

        Self::new(api_key, secret)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a request for BTC Markets' API
    ///
    /// Signature algorithm:
    /// 1. message = path + "\n" + timestamp + "\n" + body
    /// 2. HMAC-SHA512(secret, message)
    /// 3. Base64 encode result
    ///
    /// # Arguments
    /// * `path` - Request path including identifiers (e.g., "/order/create")
    /// * `timestamp` - Milliseconds since epoch, same value as the `timestamp` header
    /// * `body` - Exact JSON body sent, empty for GET
    pub fn sign(&self, path: &str, timestamp: i64, body: &str) -> String {
        let message = canonical_message(path, timestamp, body);
        trace!(path, timestamp, body_len = body.len(), "signing request");

        let mut mac = HmacSha512::new_from_slice(self.secret.expose_secret())
            .expect("HMAC can take key of any size");
        mac.update(message.as_bytes());

        BASE64.encode(mac.finalize().into_bytes())
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretBox with same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret: SecretBox::new(Box::new(self.secret.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", prefix))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Request signer for building authenticated requests
///
/// Fixes the timestamp once so the `timestamp` header and the signed message
/// always agree.
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    path: String,
    timestamp: i64,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer stamped with the current time
    pub fn new(credentials: &'a Credentials, path: impl Into<String>) -> Self {
        Self::at(credentials, path, timestamp_millis())
    }

    /// Create a request signer with an explicit timestamp
    pub fn at(credentials: &'a Credentials, path: impl Into<String>, timestamp: i64) -> Self {
        Self {
            credentials,
            path: path.into(),
            timestamp,
        }
    }

    /// Get the timestamp for this request
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Get the path being signed
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Sign the request with the given body
    pub fn sign(&self, body: &str) -> String {
        self.credentials.sign(&self.path, self.timestamp, body)
    }
}
