//! Credentials and request signing for the BTC Markets REST API
//!
//! Every private BTC Markets request carries three headers: `apikey`,
//! `timestamp` (milliseconds since the Unix epoch) and `signature`, the
//! base64-encoded HMAC-SHA512 of `path + "\n" + timestamp + "\n" + body`
//! keyed with the decoded API secret.
//!
//! # Example
//!
//! ```no_run
//! use btcmarkets_auth::{Credentials, RequestSigner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load credentials from environment
//!     let creds = Credentials::from_env()?;
//!
//!     // Sign a GET request (empty body)
//!     let signer = RequestSigner::new(&creds, "/account/balance");
//!     let signature = signer.sign("");
//!     println!("{} {}", signer.timestamp(), signature);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;

pub use credentials::{
    canonical_message, timestamp_millis, Credentials, RequestSigner, API_KEY_ENV, API_SECRET_ENV,
};
pub use error::{AuthError, AuthResult};
