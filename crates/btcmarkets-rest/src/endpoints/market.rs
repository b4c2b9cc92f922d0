//! Public market data endpoints
//!
//! These endpoints don't require authentication. They share the restricted
//! rate class with the account endpoints.

use btcmarkets_types::{Currency, Instrument, RateClass, TradeId};
use tracing::{debug, instrument};

use crate::error::RestResult;
use crate::pipeline::{Access, Pipeline};
use crate::types::{MarketOrderbook, MarketTick, MarketTrades};

/// Path of the trades endpoint, with the `since` cursor when it is positive
pub(crate) fn trades_path(instrument: Instrument, currency: Currency, since: Option<TradeId>) -> String {
    let mut path = format!("/market/{}/{}/trades", instrument, currency);
    if let Some(since) = since.filter(|id| id.0 > 0) {
        path.push_str(&format!("?since={}", since));
    }
    path
}

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// Get the ticker for a market
    ///
    /// # Arguments
    /// * `instrument` - Traded asset (e.g., BTC)
    /// * `currency` - Quote currency (e.g., AUD)
    #[instrument(skip(self))]
    pub async fn tick(&self, instrument: Instrument, currency: Currency) -> RestResult<MarketTick> {
        let path = format!("/market/{}/{}/tick", instrument, currency);
        debug!("Fetching tick for {}/{}", instrument, currency);

        self.pipeline
            .get(&path, RateClass::Restricted, Access::Public)
            .await
    }

    /// Get the orderbook for a market
    #[instrument(skip(self))]
    pub async fn orderbook(&self, instrument: Instrument, currency: Currency) -> RestResult<MarketOrderbook> {
        let path = format!("/market/{}/{}/orderbook", instrument, currency);
        debug!("Fetching orderbook for {}/{}", instrument, currency);

        self.pipeline
            .get(&path, RateClass::Restricted, Access::Public)
            .await
    }

    /// Get recent trades for a market
    ///
    /// # Arguments
    /// * `since` - Only return trades after this trade id; ignored unless positive
    #[instrument(skip(self))]
    pub async fn trades(
        &self,
        instrument: Instrument,
        currency: Currency,
        since: Option<TradeId>,
    ) -> RestResult<MarketTrades> {
        let path = trades_path(instrument, currency, since);
        debug!("Fetching trades for {}/{}", instrument, currency);

        self.pipeline
            .get(&path, RateClass::Restricted, Access::Public)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trades_path() {
        assert_eq!(
            trades_path(Instrument::Btc, Currency::Aud, None),
            "/market/BTC/AUD/trades"
        );
        assert_eq!(
            trades_path(Instrument::Eth, Currency::Aud, Some(TradeId(0))),
            "/market/ETH/AUD/trades"
        );
        assert_eq!(
            trades_path(Instrument::Eth, Currency::Btc, Some(TradeId(-5))),
            "/market/ETH/BTC/trades"
        );
        assert_eq!(
            trades_path(Instrument::Xrp, Currency::Aud, Some(TradeId(4432702312))),
            "/market/XRP/AUD/trades?since=4432702312"
        );
    }
}
