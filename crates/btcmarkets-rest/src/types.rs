//! Types for BTC Markets REST API requests and responses

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use btcmarkets_types::{
    AmountDecimal, AmountWhole, Currency, FundTransferId, Instrument, OrderId, OrderSide,
    OrderStatus, OrderType, TradeId,
};
use serde::{Deserialize, Serialize};

use crate::error::{RestError, RestResult};

// ============================================================================
// Logical failure envelope
// ============================================================================

/// A response body reporting `success: false`
///
/// BTC Markets signals business-level rejections (insufficient funds,
/// unknown order, bad nonce) inside an otherwise well-formed JSON body,
/// frequently with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeFailure {
    /// `errorCode`, when present
    pub code: Option<i64>,
    /// `errorMessage`, verbatim
    pub message: String,
}

impl ExchangeFailure {
    /// Inspect a decoded body for an explicit `success: false`
    ///
    /// Bodies that are not objects, or that lack the field, are not failures.
    pub fn detect(body: &serde_json::Value) -> Option<Self> {
        let object = body.as_object()?;
        if object.get("success")?.as_bool()? {
            return None;
        }

        let code = object.get("errorCode").and_then(serde_json::Value::as_i64);
        let message = object
            .get("errorMessage")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unspecified exchange error")
            .to_string();

        Some(Self { code, message })
    }

    pub(crate) fn into_error(self, status: u16) -> RestError {
        RestError::Exchange {
            code: self.code,
            message: self.message,
            status,
        }
    }
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Ticker for one instrument/currency market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTick {
    /// Best bid price
    pub best_bid: AmountDecimal,
    /// Best ask price
    pub best_ask: AmountDecimal,
    /// Last traded price
    pub last_price: AmountDecimal,
    /// Quote currency
    pub currency: Currency,
    /// Traded instrument
    pub instrument: Instrument,
    /// Exchange time (seconds since epoch)
    pub timestamp: i64,
    /// Volume traded over the last 24 hours
    #[serde(rename = "volume24h")]
    pub volume_24h: AmountDecimal,
}

impl MarketTick {
    /// Difference between best ask and best bid
    pub fn spread(&self) -> AmountDecimal {
        AmountDecimal::new(self.best_ask.value() - self.best_bid.value())
    }
}

/// One orderbook level, `[price, volume]` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel(pub AmountDecimal, pub AmountDecimal);

impl BookLevel {
    /// Level price
    pub fn price(&self) -> AmountDecimal {
        self.0
    }

    /// Volume resting at this price
    pub fn volume(&self) -> AmountDecimal {
        self.1
    }
}

/// Orderbook snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOrderbook {
    /// Quote currency
    pub currency: Currency,
    /// Traded instrument
    pub instrument: Instrument,
    /// Exchange time (seconds since epoch)
    pub timestamp: i64,
    /// Ask levels, best first
    pub asks: Vec<BookLevel>,
    /// Bid levels, best first
    pub bids: Vec<BookLevel>,
}

impl MarketOrderbook {
    /// Get the best ask level
    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    /// Get the best bid level
    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    /// Get the spread
    pub fn spread(&self) -> Option<AmountDecimal> {
        let ask = self.best_ask()?.price().value();
        let bid = self.best_bid()?.price().value();
        Some(AmountDecimal::new(ask - bid))
    }
}

/// A public trade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketTrade {
    /// Trade id
    #[serde(rename = "tid")]
    pub trade_id: TradeId,
    /// Traded amount of the instrument
    pub amount: AmountDecimal,
    /// Trade price
    pub price: AmountDecimal,
    /// Trade time (seconds since epoch)
    #[serde(rename = "date")]
    pub timestamp: i64,
}

impl MarketTrade {
    /// Amount times price
    pub fn total(&self) -> AmountDecimal {
        self.amount * self.price
    }
}

impl fmt::Display for MarketTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade {}: {} - {} at {}",
            self.trade_id,
            self.total(),
            self.amount,
            self.price
        )
    }
}

/// Recent public trades, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketTrades(pub Vec<MarketTrade>);

impl MarketTrades {
    /// One trade per line
    pub fn describe(&self) -> String {
        self.0.iter().map(|trade| format!("{}\n", trade)).collect()
    }

    /// Iterate over the trades
    pub fn iter(&self) -> impl Iterator<Item = &MarketTrade> {
        self.0.iter()
    }

    /// Number of trades
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no trades were returned
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest trade id, suitable as the next `since` cursor
    pub fn latest_id(&self) -> Option<TradeId> {
        self.0.iter().map(|trade| trade.trade_id).max()
    }
}

// ============================================================================
// Account Types
// ============================================================================

/// Balance of one currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// Currency
    pub currency: Currency,
    /// Total balance
    pub balance: AmountWhole,
    /// Funds reserved by open orders and pending withdrawals
    pub pending_funds: AmountWhole,
}

impl AccountBalance {
    /// Balance not tied up in pending funds
    pub fn available(&self) -> AmountWhole {
        AmountWhole(self.balance.0.saturating_sub(self.pending_funds.0))
    }
}

impl fmt::Display for AccountBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.currency, self.balance.to_decimal())
    }
}

/// Trading fee for one market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingFee {
    /// Fee rate, whole units (100_000_000 = 100%)
    #[serde(rename = "tradingFeeRate")]
    pub trading_fee_rate: AmountWhole,
    /// Traded volume over the last 30 days
    #[serde(rename = "volume30Day")]
    pub volume_30_day: AmountWhole,
}

// ============================================================================
// Order Types
// ============================================================================

/// Market bids are sent at the lowest possible price
pub const MARKET_BID_PRICE: AmountWhole = AmountWhole(1);

/// Market asks are sent at the highest accepted price
pub const MARKET_ASK_PRICE: AmountWhole = AmountWhole(99_999_900_000_000);

/// Decimal places allowed on AUD prices
pub const AUD_PRICE_DECIMALS: u32 = 2;

static CLIENT_REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a process-unique client request id
///
/// Millisecond timestamp plus an atomic counter, so rapid successive orders
/// never share an id.
pub fn generate_client_request_id() -> String {
    let counter = CLIENT_REQUEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!(
        "btcm-{}-{:06}",
        btcmarkets_auth::timestamp_millis(),
        counter % 1_000_000
    )
}

/// Order to be placed
///
/// Built with [`NewOrder::limit`] or [`NewOrder::market`] and turned into the
/// wire request by [`NewOrder::into_request`], which validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Quote currency
    pub currency: Currency,
    /// Traded instrument
    pub instrument: Instrument,
    /// Limit price (ignored for market orders)
    pub price: AmountWhole,
    /// Volume of the instrument
    pub volume: AmountWhole,
    /// Side
    pub side: OrderSide,
    /// Type
    pub order_type: OrderType,
    /// Caller-chosen id, generated when absent
    pub client_request_id: Option<String>,
}

impl NewOrder {
    /// Create a limit order
    pub fn limit(
        instrument: Instrument,
        currency: Currency,
        side: OrderSide,
        price: AmountWhole,
        volume: AmountWhole,
    ) -> Self {
        Self {
            currency,
            instrument,
            price,
            volume,
            side,
            order_type: OrderType::Limit,
            client_request_id: None,
        }
    }

    /// Create a market order
    pub fn market(instrument: Instrument, currency: Currency, side: OrderSide, volume: AmountWhole) -> Self {
        Self {
            currency,
            instrument,
            price: AmountWhole::ZERO,
            volume,
            side,
            order_type: OrderType::Market,
            client_request_id: None,
        }
    }

    /// Set the client request id
    pub fn with_client_request_id(mut self, id: impl Into<String>) -> Self {
        self.client_request_id = Some(id.into());
        self
    }

    /// Check the order against the exchange's acceptance rules
    pub fn validate(&self) -> RestResult<()> {
        if !self.volume.is_positive() {
            return Err(RestError::InvalidParameter(format!(
                "volume must be positive, got {}",
                self.volume
            )));
        }

        if self.order_type == OrderType::Limit {
            if !self.price.is_positive() {
                return Err(RestError::InvalidParameter(format!(
                    "limit price must be positive, got {}",
                    self.price
                )));
            }
            if self.currency == Currency::Aud && !self.price.has_at_most_decimals(AUD_PRICE_DECIMALS) {
                return Err(RestError::InvalidParameter(format!(
                    "AUD prices allow at most two decimal places, got {}",
                    self.price.to_decimal()
                )));
            }
        }

        if matches!(&self.client_request_id, Some(id) if id.trim().is_empty()) {
            return Err(RestError::InvalidParameter(
                "client request id must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Price actually transmitted for this order
    pub fn effective_price(&self) -> AmountWhole {
        match (self.order_type, self.side) {
            (OrderType::Market, OrderSide::Bid) => MARKET_BID_PRICE,
            (OrderType::Market, OrderSide::Ask) => MARKET_ASK_PRICE,
            (OrderType::Limit, _) => self.price,
        }
    }

    /// Validate and build the wire request
    pub fn into_request(self) -> RestResult<OrderCreateRequest> {
        self.validate()?;
        let price = self.effective_price();

        Ok(OrderCreateRequest {
            currency: self.currency,
            instrument: self.instrument,
            price,
            volume: self.volume,
            order_side: self.side,
            order_type: self.order_type,
            client_request_id: self
                .client_request_id
                .unwrap_or_else(generate_client_request_id),
        })
    }
}

/// Body of `POST /order/create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreateRequest {
    /// Quote currency
    pub currency: Currency,
    /// Traded instrument
    pub instrument: Instrument,
    /// Price, whole units
    pub price: AmountWhole,
    /// Volume, whole units
    pub volume: AmountWhole,
    /// Side
    #[serde(rename = "orderSide")]
    pub order_side: OrderSide,
    /// Type (the exchange spells this key in lowercase)
    #[serde(rename = "ordertype")]
    pub order_type: OrderType,
    /// Client request id
    #[serde(rename = "clientRequestId")]
    pub client_request_id: String,
}

/// Result of a successful order creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    /// Exchange-assigned order id
    pub id: OrderId,
    /// Echo of the client request id
    #[serde(default)]
    pub client_request_id: Option<String>,
}

/// Body of `POST /order/cancel` and `POST /order/detail`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIdsRequest {
    /// Orders to act on
    #[serde(rename = "orderIds")]
    pub order_ids: Vec<OrderId>,
}

impl OrderIdsRequest {
    /// Create the request, rejecting an empty id list
    pub fn new(order_ids: &[OrderId]) -> RestResult<Self> {
        if order_ids.is_empty() {
            return Err(RestError::InvalidParameter(
                "at least one order id is required".to_string(),
            ));
        }
        Ok(Self {
            order_ids: order_ids.to_vec(),
        })
    }
}

/// Per-order outcome of a cancel request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelResult {
    /// Whether this order was cancelled
    pub success: bool,
    /// Error code when not cancelled
    #[serde(default)]
    pub error_code: Option<i64>,
    /// Error message when not cancelled
    #[serde(default)]
    pub error_message: Option<String>,
    /// Order id
    pub id: OrderId,
}

impl OrderCancelResult {
    /// Convert a failed item into an exchange error
    pub fn into_result(self) -> RestResult<OrderId> {
        if self.success {
            return Ok(self.id);
        }
        Err(RestError::Exchange {
            code: self.error_code,
            message: self
                .error_message
                .unwrap_or_else(|| format!("order {} was not cancelled", self.id)),
            status: 200,
        })
    }
}

/// Response of `POST /order/cancel`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelResponse {
    /// One entry per requested order
    #[serde(default)]
    pub responses: Vec<OrderCancelResult>,
}

impl OrderCancelResponse {
    /// Ids that were cancelled
    pub fn cancelled(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.responses.iter().filter(|r| r.success).map(|r| r.id)
    }

    /// Entries that failed
    pub fn failed(&self) -> impl Iterator<Item = &OrderCancelResult> {
        self.responses.iter().filter(|r| !r.success)
    }
}

/// Body of the order and trade history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    /// Quote currency
    pub currency: Currency,
    /// Traded instrument
    pub instrument: Instrument,
    /// Maximum number of records
    pub limit: u32,
    /// Only return records with an id greater than this (0 = from the newest)
    pub since: i64,
}

impl OrderQuery {
    /// Default page size
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Query a market with the default page size
    pub fn new(instrument: Instrument, currency: Currency) -> Self {
        Self {
            currency,
            instrument,
            limit: Self::DEFAULT_LIMIT,
            since: 0,
        }
    }

    /// Set page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the paging cursor
    pub fn since(mut self, since: i64) -> Self {
        self.since = since;
        self
    }
}

/// Fill belonging to an order, or an entry of the trade history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTrade {
    /// Trade id
    pub id: TradeId,
    /// Creation time (ms since epoch)
    pub creation_time: i64,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Price, whole units
    pub price: AmountWhole,
    /// Volume, whole units
    pub volume: AmountWhole,
    /// Fee, whole units
    pub fee: AmountWhole,
    /// Side (trade history only)
    #[serde(default)]
    pub side: Option<OrderSide>,
    /// Owning order (trade history only)
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

/// An order as reported by history, open and detail queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub id: OrderId,
    /// Quote currency
    pub currency: Currency,
    /// Traded instrument
    pub instrument: Instrument,
    /// Side
    pub order_side: OrderSide,
    /// Type
    #[serde(rename = "ordertype")]
    pub order_type: OrderType,
    /// Creation time (ms since epoch)
    pub creation_time: i64,
    /// Status
    pub status: OrderStatus,
    /// Error attached to failed orders
    #[serde(default)]
    pub error_message: Option<String>,
    /// Price, whole units
    pub price: AmountWhole,
    /// Volume, whole units
    pub volume: AmountWhole,
    /// Unfilled volume, whole units
    pub open_volume: AmountWhole,
    /// Client request id supplied at creation
    #[serde(default)]
    pub client_request_id: Option<String>,
    /// Fills
    #[serde(default)]
    pub trades: Vec<OrderTrade>,
}

impl Order {
    /// Volume already matched
    pub fn filled_volume(&self) -> AmountWhole {
        AmountWhole(self.volume.0.saturating_sub(self.open_volume.0))
    }
}

/// List of orders returned by history, open and detail queries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderList {
    /// Orders
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Response of `POST /order/trade/history`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeHistory {
    /// Trades, newest first
    #[serde(default)]
    pub trades: Vec<OrderTrade>,
}

// ============================================================================
// Fund Transfer Types
// ============================================================================

/// Body of `POST /fundtransfer/withdrawCrypto`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawCryptoRequest {
    /// Amount, whole units
    pub amount: AmountWhole,
    /// Destination address
    pub address: String,
    /// Currency to withdraw
    pub currency: Currency,
}

impl WithdrawCryptoRequest {
    /// Create a withdrawal request
    pub fn new(currency: Currency, amount: AmountWhole, address: impl Into<String>) -> Self {
        Self {
            amount,
            address: address.into(),
            currency,
        }
    }

    /// Reject requests the exchange would never accept
    pub fn validate(&self) -> RestResult<()> {
        if !self.amount.is_positive() {
            return Err(RestError::InvalidParameter("withdrawal amount must be positive".into()));
        }
        if self.currency.is_fiat() {
            return Err(RestError::InvalidParameter(format!(
                "{} cannot be withdrawn as crypto",
                self.currency
            )));
        }
        if self.address.trim().is_empty() {
            return Err(RestError::InvalidParameter("withdrawal address is required".into()));
        }
        Ok(())
    }
}

/// Body of `POST /fundtransfer/withdrawEFT`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawEftRequest {
    /// Name on the destination account
    pub account_name: String,
    /// Destination account number
    pub account_number: String,
    /// Destination bank
    pub bank_name: String,
    /// Destination BSB
    pub bsb_number: String,
    /// Amount, whole units
    pub amount: AmountWhole,
    /// Currency (always AUD)
    pub currency: Currency,
}

impl WithdrawEftRequest {
    /// Create an AUD bank withdrawal request
    pub fn new(
        account_name: impl Into<String>,
        account_number: impl Into<String>,
        bank_name: impl Into<String>,
        bsb_number: impl Into<String>,
        amount: AmountWhole,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            account_number: account_number.into(),
            bank_name: bank_name.into(),
            bsb_number: bsb_number.into(),
            amount,
            currency: Currency::Aud,
        }
    }

    /// Reject requests the exchange would never accept
    pub fn validate(&self) -> RestResult<()> {
        if !self.amount.is_positive() {
            return Err(RestError::InvalidParameter("withdrawal amount must be positive".into()));
        }
        if !self.currency.is_fiat() {
            return Err(RestError::InvalidParameter(format!(
                "EFT withdrawals must be in AUD, got {}",
                self.currency
            )));
        }
        let fields = [
            ("account name", &self.account_name),
            ("account number", &self.account_number),
            ("bank name", &self.bank_name),
            ("BSB number", &self.bsb_number),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(RestError::InvalidParameter(format!("{} is required", name)));
            }
        }
        Ok(())
    }
}

/// Outcome of a withdrawal request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundTransfer {
    /// Transfer id
    pub fund_transfer_id: FundTransferId,
    /// Transfer status as reported
    pub status: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time (ms since epoch)
    #[serde(default)]
    pub creation_time: i64,
    /// Currency
    pub currency: Currency,
    /// Amount, whole units
    pub amount: AmountWhole,
    /// Fee, whole units
    #[serde(default)]
    pub fee: AmountWhole,
}
