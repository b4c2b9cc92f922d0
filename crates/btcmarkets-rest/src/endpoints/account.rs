//! Private account endpoints
//!
//! These endpoints require authentication.

use btcmarkets_types::{Currency, Instrument, RateClass};
use tracing::{debug, instrument};

use crate::error::RestResult;
use crate::pipeline::{Access, Pipeline};
use crate::types::{AccountBalance, TradingFee};

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// Get balances of every currency on the account
    #[instrument(skip(self))]
    pub async fn balance(&self) -> RestResult<Vec<AccountBalance>> {
        debug!("Fetching account balance");
        self.pipeline
            .get("/account/balance", RateClass::Restricted, Access::Private)
            .await
    }

    /// Get the trading fee for a market
    #[instrument(skip(self))]
    pub async fn trading_fee(&self, instrument: Instrument, currency: Currency) -> RestResult<TradingFee> {
        let path = format!("/account/{}/{}/tradingfee", instrument, currency);
        debug!("Fetching trading fee for {}/{}", instrument, currency);

        self.pipeline
            .get(&path, RateClass::Restricted, Access::Private)
            .await
    }
}
