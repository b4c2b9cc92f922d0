//! Private fund transfer endpoints
//!
//! These endpoints move funds off the exchange. Requests are validated
//! locally before they are signed.

use btcmarkets_types::RateClass;
use tracing::{info, instrument};

use crate::error::RestResult;
use crate::pipeline::Pipeline;
use crate::types::{FundTransfer, WithdrawCryptoRequest, WithdrawEftRequest};

/// Private fund transfer endpoints
pub struct FundTransferEndpoints<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> FundTransferEndpoints<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// Withdraw a crypto currency to an external address
    #[instrument(skip(self, request), fields(currency = %request.currency, amount = %request.amount))]
    pub async fn withdraw_crypto(&self, request: &WithdrawCryptoRequest) -> RestResult<FundTransfer> {
        request.validate()?;

        let transfer: FundTransfer = self
            .pipeline
            .post("/fundtransfer/withdrawCrypto", RateClass::Restricted, request)
            .await?;

        info!(fund_transfer_id = %transfer.fund_transfer_id, status = %transfer.status, "Crypto withdrawal requested");
        Ok(transfer)
    }

    /// Withdraw AUD to a bank account
    #[instrument(skip(self, request), fields(amount = %request.amount))]
    pub async fn withdraw_eft(&self, request: &WithdrawEftRequest) -> RestResult<FundTransfer> {
        request.validate()?;

        let transfer: FundTransfer = self
            .pipeline
            .post("/fundtransfer/withdrawEFT", RateClass::Restricted, request)
            .await?;

        info!(fund_transfer_id = %transfer.fund_transfer_id, status = %transfer.status, "EFT withdrawal requested");
        Ok(transfer)
    }
}
