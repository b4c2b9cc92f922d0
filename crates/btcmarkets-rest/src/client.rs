//! Main REST client implementation

use std::sync::Arc;
use std::time::Duration;

use btcmarkets_auth::{Credentials, API_KEY_ENV, API_SECRET_ENV};
use btcmarkets_types::{Currency, Instrument, OrderId, RateClass, RateLimitConfig, TradeId};
use tracing::info;

use crate::endpoints::{AccountEndpoints, FundTransferEndpoints, MarketEndpoints, OrderEndpoints};
use crate::error::{RestError, RestResult};
use crate::pipeline::Pipeline;
use crate::rate_gate::RateGate;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{
    AccountBalance, FundTransfer, MarketOrderbook, MarketTick, MarketTrades, NewOrder,
    OrderCancelResponse, OrderCreated, OrderList, OrderQuery, TradeHistory, TradingFee,
    WithdrawCryptoRequest, WithdrawEftRequest,
};

/// Production API location
pub const DEFAULT_BASE_URL: &str = "https://api.btcmarkets.net";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "BTCMARKETS_BASE_URL";

/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "BTCMARKETS_TIMEOUT_SECS";

/// BTC Markets REST API client
///
/// Provides access to both public and private endpoints. Every call is paced
/// by the rate gate of its endpoint's rate class. Clones share the gates; the
/// gates stop when the last clone is dropped or on [`shutdown`](Self::shutdown).
///
/// # Example
///
/// ```no_run
/// use btcmarkets_rest::{BtcMarketsClient, Credentials};
/// use btcmarkets_types::{Currency, Instrument};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = BtcMarketsClient::new()?;
///     let tick = client.market_tick(Instrument::Btc, Currency::Aud).await?;
///     println!("last: {}", tick.last_price);
///
///     // With authentication for private endpoints
///     let creds = Credentials::from_env()?;
///     let auth_client = BtcMarketsClient::with_credentials(creds)?;
///     for balance in auth_client.account_balance().await? {
///         println!("{}", balance);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BtcMarketsClient {
    pipeline: Arc<Pipeline>,
}

impl BtcMarketsClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available. Must be called from within a
    /// tokio runtime, which drives the rate gates.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    ///
    /// All endpoints (public and private) will be available.
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout, config.user_agent.as_deref())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a new client sending requests through `transport`
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> RestResult<Self> {
        config.validate()?;
        let has_credentials = config.credentials.is_some();

        let pipeline = Pipeline::new(
            transport,
            config.credentials,
            &config.rate_limits,
            config.base_url,
            config.acquire_timeout,
        )?;

        info!(
            base_url = pipeline.base_url(),
            has_credentials, "Created BTC Markets REST client"
        );

        Ok(Self {
            pipeline: Arc::new(pipeline),
        })
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.pipeline.has_credentials()
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        self.pipeline.base_url()
    }

    /// Rate gate pacing a rate class
    pub fn rate_gate(&self, class: RateClass) -> &RateGate {
        self.pipeline.gate(class)
    }

    /// Stop both rate gates
    ///
    /// Affects every clone. Subsequent calls fail with a closed-gate error
    /// once banked permits are used up.
    pub fn shutdown(&self) {
        info!("Shutting down BTC Markets REST client");
        self.pipeline.stop();
    }

    fn require_credentials(&self) -> RestResult<()> {
        if self.has_credentials() {
            Ok(())
        } else {
            Err(RestError::AuthRequired)
        }
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.pipeline)
    }

    /// Get the ticker for a market
    pub async fn market_tick(&self, instrument: Instrument, currency: Currency) -> RestResult<MarketTick> {
        self.market().tick(instrument, currency).await
    }

    /// Get the orderbook for a market
    pub async fn market_orderbook(
        &self,
        instrument: Instrument,
        currency: Currency,
    ) -> RestResult<MarketOrderbook> {
        self.market().orderbook(instrument, currency).await
    }

    /// Get recent trades, optionally only those after `since`
    pub async fn market_trades(
        &self,
        instrument: Instrument,
        currency: Currency,
        since: Option<TradeId>,
    ) -> RestResult<MarketTrades> {
        self.market().trades(instrument, currency, since).await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        self.require_credentials()?;
        Ok(AccountEndpoints::new(&self.pipeline))
    }

    /// Get account balances
    pub async fn account_balance(&self) -> RestResult<Vec<AccountBalance>> {
        self.account()?.balance().await
    }

    /// Get the trading fee for a market
    pub async fn account_trading_fee(
        &self,
        instrument: Instrument,
        currency: Currency,
    ) -> RestResult<TradingFee> {
        self.account()?.trading_fee(instrument, currency).await
    }

    // ========================================================================
    // Private Order Endpoints
    // ========================================================================

    /// Get order endpoints (requires credentials)
    pub fn orders(&self) -> RestResult<OrderEndpoints<'_>> {
        self.require_credentials()?;
        Ok(OrderEndpoints::new(&self.pipeline))
    }

    /// Place a new order
    pub async fn order_create(&self, order: NewOrder) -> RestResult<OrderCreated> {
        self.orders()?.create(order).await
    }

    /// Cancel orders, returning the per-order outcome
    pub async fn order_cancel(&self, order_ids: &[OrderId]) -> RestResult<OrderCancelResponse> {
        self.orders()?.cancel(order_ids).await
    }

    /// Cancel one order, failing if the exchange refused
    pub async fn order_cancel_one(&self, order_id: OrderId) -> RestResult<OrderId> {
        self.orders()?.cancel_one(order_id).await
    }

    /// Get order history
    pub async fn order_history(&self, query: OrderQuery) -> RestResult<OrderList> {
        self.orders()?.history(query).await
    }

    /// Get open orders
    pub async fn order_open(&self, query: OrderQuery) -> RestResult<OrderList> {
        self.orders()?.open(query).await
    }

    /// Get trade history
    pub async fn order_trade_history(&self, query: OrderQuery) -> RestResult<TradeHistory> {
        self.orders()?.trade_history(query).await
    }

    /// Get details of specific orders
    pub async fn order_detail(&self, order_ids: &[OrderId]) -> RestResult<OrderList> {
        self.orders()?.detail(order_ids).await
    }

    // ========================================================================
    // Private Fund Transfer Endpoints
    // ========================================================================

    /// Get fund transfer endpoints (requires credentials)
    pub fn fund_transfer(&self) -> RestResult<FundTransferEndpoints<'_>> {
        self.require_credentials()?;
        Ok(FundTransferEndpoints::new(&self.pipeline))
    }

    /// Withdraw crypto to an external address
    pub async fn withdraw_crypto(&self, request: &WithdrawCryptoRequest) -> RestResult<FundTransfer> {
        self.fund_transfer()?.withdraw_crypto(request).await
    }

    /// Withdraw AUD to a bank account
    pub async fn withdraw_eft(&self, request: &WithdrawEftRequest) -> RestResult<FundTransfer> {
        self.fund_transfer()?.withdraw_eft(request).await
    }
}

impl std::fmt::Debug for BtcMarketsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BtcMarketsClient")
            .field("base_url", &self.base_url())
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API location, without trailing slash
    pub base_url: String,
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout
    pub timeout: Duration,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Rate gate settings per rate class
    pub rate_limits: RateLimitConfig,
    /// Longest time a call may wait for a permit (unbounded when `None`)
    pub acquire_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            rate_limits: RateLimitConfig::btcmarkets_defaults(),
            acquire_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from environment variables
    ///
    /// Credentials are loaded when either `BTCMARKETS_API_KEY` or
    /// `BTCMARKETS_API_SECRET` is set; both must then be valid.
    /// `BTCMARKETS_BASE_URL` and `BTCMARKETS_TIMEOUT_SECS` override the
    /// defaults when present.
    pub fn from_env() -> RestResult<Self> {
        let mut config = Self::default();

        if std::env::var_os(API_KEY_ENV).is_some() || std::env::var_os(API_SECRET_ENV).is_some() {
            config.credentials = Some(Credentials::from_env()?);
        }

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| RestError::Config(format!("{} must be a whole number of seconds, got {:?}", TIMEOUT_ENV, raw)))?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the API location
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set rate limits
    pub fn with_rate_limits(mut self, rate_limits: RateLimitConfig) -> Self {
        self.rate_limits = rate_limits;
        self
    }

    /// Bound the wait for a rate gate permit
    pub fn with_acquire_timeout(mut self, deadline: Duration) -> Self {
        self.acquire_timeout = Some(deadline);
        self
    }

    /// Check the configuration without touching the network
    pub fn validate(&self) -> RestResult<()> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(RestError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(RestError::Config("request timeout must be greater than zero".into()));
        }
        if self.acquire_timeout.is_some_and(|deadline| deadline.is_zero()) {
            return Err(RestError::Config("acquire timeout must be greater than zero".into()));
        }
        for class in RateClass::ALL {
            let gate = class.get_config(&self.rate_limits);
            if gate.burst == 0 || gate.interval.is_zero() {
                return Err(RestError::Config(format!(
                    "{} rate class needs a positive interval and burst",
                    class
                )));
            }
        }
        Ok(())
    }
}
