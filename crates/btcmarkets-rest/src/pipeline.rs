//! Signed request pipeline
//!
//! Every endpoint goes through [`Pipeline::get`] or [`Pipeline::post`]:
//!
//! 1. serialize the body once; the same string is signed and sent
//! 2. take a permit from the gate of the endpoint's rate class
//! 3. sign `path\ntimestamp\nbody` for private endpoints
//! 4. dispatch through the injected [`HttpTransport`]
//! 5. classify the response
//!
//! Classification checks for an explicit `success: false` before anything
//! else, so a logical rejection is never reported as a status or decode
//! error.

use std::sync::Arc;
use std::time::Duration;

use btcmarkets_auth::{Credentials, RequestSigner};
use btcmarkets_types::{RateClass, RateLimitConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::error::{RestError, RestResult};
use crate::rate_gate::{Permit, RateGate};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::types::ExchangeFailure;

/// Whether an endpoint needs signing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No authentication headers
    Public,
    /// Signed with the client's credentials
    Private,
}

/// Shared request machinery behind every endpoint group
pub struct Pipeline {
    transport: Arc<dyn HttpTransport>,
    credentials: Option<Arc<Credentials>>,
    restricted: RateGate,
    frequent: RateGate,
    base_url: String,
    acquire_timeout: Option<Duration>,
}

impl Pipeline {
    /// Start both rate gates and assemble the pipeline
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Option<Credentials>,
        rate_limits: &RateLimitConfig,
        base_url: impl Into<String>,
        acquire_timeout: Option<Duration>,
    ) -> RestResult<Self> {
        let restricted = RateGate::with_config(RateClass::Restricted.get_config(rate_limits))?;
        let frequent = RateGate::with_config(RateClass::Frequent.get_config(rate_limits))?;

        Ok(Self {
            transport,
            credentials: credentials.map(Arc::new),
            restricted,
            frequent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            acquire_timeout,
        })
    }

    /// Gate serving a rate class
    pub fn gate(&self, class: RateClass) -> &RateGate {
        match class {
            RateClass::Restricted => &self.restricted,
            RateClass::Frequent => &self.frequent,
        }
    }

    /// Check if private endpoints can be called
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop both gates; later calls fail with a closed-gate error
    pub fn stop(&self) {
        self.restricted.stop();
        self.frequent.stop();
    }

    /// Issue a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str, class: RateClass, access: Access) -> RestResult<T> {
        self.dispatch(HttpMethod::Get, path, class, access, None).await
    }

    /// Issue a signed POST request with a JSON body
    pub async fn post<B, T>(&self, path: &str, class: RateClass, body: &B) -> RestResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(body).map_err(RestError::Encode)?;
        self.dispatch(HttpMethod::Post, path, class, Access::Private, Some(body))
            .await
    }

    #[instrument(skip(self, body))]
    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        class: RateClass,
        access: Access,
        body: Option<String>,
    ) -> RestResult<T> {
        let credentials = match access {
            Access::Public => None,
            Access::Private => Some(self.credentials.as_deref().ok_or(RestError::AuthRequired)?),
        };

        let permit = self.acquire(class).await?;
        trace!(sequence = permit.sequence(), "permit acquired");

        // Stamp after waiting on the gate so the timestamp is fresh
        let signer = credentials.map(|credentials| RequestSigner::new(credentials, path));
        let request = self.build_request(method, path, body.as_deref(), signer.as_ref());

        debug!(%method, path, signed = signer.is_some(), "dispatching request");
        let response = self.transport.execute(request).await?;

        decode_response(response)
    }

    async fn acquire(&self, class: RateClass) -> RestResult<Permit> {
        let gate = self.gate(class);
        let permit = match self.acquire_timeout {
            Some(deadline) => gate.acquire_timeout(deadline).await?,
            None => gate.acquire().await?,
        };
        Ok(permit)
    }

    /// Build the outbound request for `path`
    ///
    /// `body` is transmitted verbatim and is the exact string that gets
    /// signed. GET requests sign an empty body.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&str>,
        signer: Option<&RequestSigner<'_>>,
    ) -> HttpRequest {
        let mut request = HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .with_header("Accept", "application/json")
            .with_header("Accept-Charset", "UTF-8")
            .with_header("Content-Type", "application/json");

        if let Some(signer) = signer {
            debug_assert_eq!(signer.path(), path);
            request = request
                .with_header("apikey", signer.api_key())
                .with_header("timestamp", signer.timestamp().to_string())
                .with_header("signature", signer.sign(body.unwrap_or("")));
        }

        if let Some(body) = body {
            request = request.with_body(body);
        }

        request
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.has_credentials())
            .field("restricted", &self.restricted)
            .field("frequent", &self.frequent)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Classify a response and decode it into `T`
///
/// Order: explicit `success: false`, then non-2xx status, then typed decode.
pub fn decode_response<T: DeserializeOwned>(response: HttpResponse) -> RestResult<T> {
    let HttpResponse { status, body } = response;
    let success = (200..300).contains(&status);

    let value: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(source) if success => return Err(RestError::Decode { source, body }),
        Err(_) => return Err(RestError::HttpStatus { status, body }),
    };

    if let Some(failure) = ExchangeFailure::detect(&value) {
        warn!(status, code = ?failure.code, message = %failure.message, "exchange rejected request");
        return Err(failure.into_error(status));
    }

    if !success {
        return Err(RestError::HttpStatus { status, body });
    }

    serde_json::from_value(value).map_err(|source| RestError::Decode { source, body })
}
