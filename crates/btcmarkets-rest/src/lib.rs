//! REST API client for the BTC Markets cryptocurrency exchange
//!
//! This crate provides a REST API client for trading on BTC Markets,
//! including market data, account queries, order management and fund
//! transfers.
//!
//! # Features
//!
//! - **Market Data**: Tick, orderbook, recent trades
//! - **Account**: Balances, trading fees
//! - **Orders**: Create, cancel, history, open orders, trade history, detail
//! - **Fund Transfers**: Crypto and EFT withdrawals
//!
//! # Authentication
//!
//! Private endpoints require API credentials. Requests are signed with
//! HMAC-SHA512 over `path\ntimestamp\nbody`; the body is serialized once and
//! the signed string is exactly the one transmitted.
//!
//! # Example
//!
//! ```no_run
//! use btcmarkets_rest::{BtcMarketsClient, Credentials};
//! use btcmarkets_types::{Currency, Instrument};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = BtcMarketsClient::new()?;
//!     let trades = client.market_trades(Instrument::Btc, Currency::Aud, None).await?;
//!     print!("{}", trades.describe());
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = BtcMarketsClient::with_credentials(creds)?;
//!     let balances = auth_client.account_balance().await?;
//!     println!("Balances: {:?}", balances);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! BTC Markets enforces two call-rate classes, and the client paces each
//! with its own [`RateGate`]:
//! - Restricted: 10 calls per 10 seconds (market data, account, order
//!   creation, histories, withdrawals)
//! - Frequent: 25 calls per 10 seconds (cancel, open orders, order detail)
//!
//! Calls wait for a permit. Use [`ClientConfig::with_acquire_timeout`] to
//! bound that wait.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod pipeline;
pub mod rate_gate;
pub mod transport;
pub mod types;

// Re-export main types
pub use btcmarkets_auth::Credentials;
pub use client::{BtcMarketsClient, ClientConfig, DEFAULT_BASE_URL};
pub use error::{RestError, RestResult};
pub use rate_gate::{Permit, RateGate, RateGateError};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;

// Re-export endpoint-specific types
pub use types::{
    // Market data
    BookLevel, MarketOrderbook, MarketTick, MarketTrade, MarketTrades,
    // Account
    AccountBalance, TradingFee,
    // Orders
    NewOrder, Order, OrderCancelResponse, OrderCancelResult, OrderCreated, OrderList, OrderQuery,
    OrderTrade, TradeHistory,
    // Fund transfers
    FundTransfer, WithdrawCryptoRequest, WithdrawEftRequest,
};
