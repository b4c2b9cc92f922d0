//! Private order endpoints
//!
//! Creation and both history queries use the restricted rate class;
//! cancel, open and detail use the frequent class.

use btcmarkets_types::{OrderId, RateClass};
use tracing::{debug, info, instrument};

use crate::error::{RestError, RestResult};
use crate::pipeline::Pipeline;
use crate::types::{
    NewOrder, OrderCancelResponse, OrderCreated, OrderIdsRequest, OrderList, OrderQuery, TradeHistory,
};

/// Private order endpoints
pub struct OrderEndpoints<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> OrderEndpoints<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// Place a new order
    ///
    /// The order is validated locally first; an invalid order never reaches
    /// the network. Market orders are sent with the extreme price for their
    /// side.
    #[instrument(skip(self, order), fields(instrument = %order.instrument, side = %order.side, order_type = %order.order_type))]
    pub async fn create(&self, order: NewOrder) -> RestResult<OrderCreated> {
        let request = order.into_request()?;
        debug!(client_request_id = %request.client_request_id, "Placing order");

        let created: OrderCreated = self
            .pipeline
            .post("/order/create", RateClass::Restricted, &request)
            .await?;

        info!(order_id = %created.id, "Order placed");
        Ok(created)
    }

    /// Cancel one or more orders
    ///
    /// Returns the per-order outcome; a partially failed batch is still `Ok`.
    #[instrument(skip(self))]
    pub async fn cancel(&self, order_ids: &[OrderId]) -> RestResult<OrderCancelResponse> {
        let request = OrderIdsRequest::new(order_ids)?;
        debug!("Cancelling {} orders", order_ids.len());

        self.pipeline
            .post("/order/cancel", RateClass::Frequent, &request)
            .await
    }

    /// Cancel a single order
    ///
    /// A rejected cancellation is reported as [`RestError::Exchange`] carrying
    /// the exchange's message for that order.
    #[instrument(skip(self))]
    pub async fn cancel_one(&self, order_id: OrderId) -> RestResult<OrderId> {
        let response = self.cancel(&[order_id]).await?;

        response
            .responses
            .into_iter()
            .find(|result| result.id == order_id)
            .ok_or_else(|| RestError::Exchange {
                code: None,
                message: format!("no cancel result returned for order {}", order_id),
                status: 200,
            })?
            .into_result()
    }

    /// Get order history for a market
    #[instrument(skip(self))]
    pub async fn history(&self, query: OrderQuery) -> RestResult<OrderList> {
        debug!("Fetching order history");
        self.pipeline
            .post("/order/history", RateClass::Restricted, &query)
            .await
    }

    /// Get open orders for a market
    #[instrument(skip(self))]
    pub async fn open(&self, query: OrderQuery) -> RestResult<OrderList> {
        debug!("Fetching open orders");
        self.pipeline
            .post("/order/open", RateClass::Frequent, &query)
            .await
    }

    /// Get trade history for a market
    #[instrument(skip(self))]
    pub async fn trade_history(&self, query: OrderQuery) -> RestResult<TradeHistory> {
        debug!("Fetching trade history");
        self.pipeline
            .post("/order/trade/history", RateClass::Restricted, &query)
            .await
    }

    /// Get details of specific orders
    #[instrument(skip(self))]
    pub async fn detail(&self, order_ids: &[OrderId]) -> RestResult<OrderList> {
        let request = OrderIdsRequest::new(order_ids)?;
        debug!("Fetching details of {} orders", order_ids.len());

        self.pipeline
            .post("/order/detail", RateClass::Frequent, &request)
            .await
    }
}
