//! Integration tests for the BTC Markets REST client
//!
//! Drives the public client API end to end against recorded response
//! fixtures: signing, rate gating, dispatch and decoding.

mod common;

use std::time::Duration;

use btcmarkets_rest::{NewOrder, OrderQuery, RestError};
use btcmarkets_types::{
    AmountWhole, Currency, Instrument, OrderSide, OrderStatus, RateClass, RateGateConfig, RateLimitConfig,
    TradeId,
};
use common::*;
use rust_decimal_macros::dec;

// =============================================================================
// Market Data Tests
// =============================================================================

#[tokio::test]
async fn test_market_data_flow() {
    let transport = mock_transport();
    transport.push_response(200, TICK_RESPONSE);
    transport.push_response(200, ORDERBOOK_RESPONSE);
    transport.push_response(200, TRADES_RESPONSE);
    let client = fixture_client(&transport, None);

    let tick = client.market_tick(Instrument::Btc, Currency::Aud).await.unwrap();
    assert_eq!(tick.last_price.value(), dec!(4215.5));
    assert_eq!(tick.spread().value(), dec!(9.98));

    let book = client.market_orderbook(Instrument::Btc, Currency::Aud).await.unwrap();
    assert_eq!(book.asks.len(), 3);
    assert_eq!(book.spread().unwrap().value(), dec!(9.98));

    let trades = client.market_trades(Instrument::Btc, Currency::Aud, None).await.unwrap();
    assert_eq!(trades.latest_id(), Some(TradeId(4432702312)));
    assert_eq!(
        trades.describe(),
        "Trade 4432702312: 42.155 - 0.01 at 4215.5\nTrade 4432702311: 6315 - 1.5 at 4210\n"
    );

    for request in transport.requests() {
        assert!(request.header("signature").is_none());
        assert!(request.body.is_none());
    }
}

// =============================================================================
// Account Tests
// =============================================================================

#[tokio::test]
async fn test_account_balance_signed_fixture() {
    let transport = mock_transport();
    transport.push_response(200, BALANCE_RESPONSE);
    let client = fixture_client(&transport, Some(test_credentials()));

    let balances = client.account_balance().await.unwrap();
    let rendered: Vec<String> = balances.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["AUD: 1000", "BTC: 0.12345678", "ETH: 0"]);
    assert_eq!(balances[0].available(), AmountWhole(97_500_000_000));

    let request = &transport.requests()[0];
    let timestamp: i64 = request.header("timestamp").unwrap().parse().unwrap();
    let expected = test_credentials().sign("/account/balance", timestamp, "");
    assert_eq!(request.header("signature"), Some(expected.as_str()));
}

// =============================================================================
// Order Tests
// =============================================================================

#[tokio::test]
async fn test_order_lifecycle() {
    let transport = mock_transport();
    transport.push_response(200, ORDER_CREATED_RESPONSE);
    transport.push_response(200, ORDER_HISTORY_RESPONSE);
    let client = fixture_client(&transport, Some(test_credentials()));

    let order = NewOrder::limit(
        Instrument::Btc,
        Currency::Aud,
        OrderSide::Bid,
        AmountWhole(421_000_000_000),
        AmountWhole(10_000_000),
    )
    .with_client_request_id("abc-cdf-1000");
    let created = client.order_create(order).await.unwrap();

    let history = client
        .order_history(OrderQuery::new(Instrument::Btc, Currency::Aud).with_limit(2))
        .await
        .unwrap();
    let placed = history.orders.iter().find(|o| o.id == created.id).unwrap();
    assert_eq!(placed.status, OrderStatus::FullyMatched);
    assert_eq!(placed.filled_volume(), AmountWhole(10_000_000));
    assert_eq!(placed.trades[0].fee.to_decimal().value(), dec!(0.035785));
    assert_eq!(history.orders[1].status, OrderStatus::Cancelled);
    assert!(history.orders[1].status.is_terminal());

    let requests = transport.requests();
    assert_eq!(
        requests[0].body.as_deref(),
        Some(r#"{"currency":"AUD","instrument":"BTC","price":421000000000,"volume":10000000,"orderSide":"Bid","ordertype":"Limit","clientRequestId":"abc-cdf-1000"}"#)
    );
    assert_eq!(
        requests[1].body.as_deref(),
        Some(r#"{"currency":"AUD","instrument":"BTC","limit":2,"since":0}"#)
    );
}

#[tokio::test]
async fn test_order_rejection_carries_exchange_message() {
    let transport = mock_transport();
    transport.push_response(200, ORDER_REJECTED_RESPONSE);
    let client = fixture_client(&transport, Some(test_credentials()));

    let order = NewOrder::market(Instrument::Eth, Currency::Aud, OrderSide::Ask, AmountWhole(100_000_000));
    match client.order_create(order).await {
        Err(RestError::Exchange { code, message, status }) => {
            assert_eq!(code, Some(3));
            assert_eq!(message, "insufficient funds");
            assert_eq!(status, 200);
        }
        other => panic!("expected exchange failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_status_is_decode_error() {
    let transport = mock_transport();
    transport.push_response(200, &ORDER_HISTORY_RESPONSE.replace("Fully Matched", "Fully Teleported"));
    let client = fixture_client(&transport, Some(test_credentials()));

    let err = client
        .order_history(OrderQuery::new(Instrument::Btc, Currency::Aud))
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Decode { .. }));
}

// =============================================================================
// Rate Gate Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_restricted_calls_are_paced() {
    let transport = mock_transport();
    for _ in 0..4 {
        transport.push_response(200, TICK_RESPONSE);
    }

    let rate_limits = RateLimitConfig::permissive()
        .with_class(RateClass::Restricted, RateGateConfig::new(Duration::from_secs(1), 2));
    let config = btcmarkets_rest::ClientConfig::new()
        .with_base_url(BASE_URL)
        .with_rate_limits(rate_limits);
    let client = btcmarkets_rest::BtcMarketsClient::with_transport(config, transport.clone()).unwrap();

    // Let the buffer fill to its burst capacity
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(client.rate_gate(RateClass::Restricted).available(), 2);

    let start = tokio::time::Instant::now();
    client.market_tick(Instrument::Btc, Currency::Aud).await.unwrap();
    client.market_tick(Instrument::Btc, Currency::Aud).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(1));

    // Third call waits for the next tick at t=3s
    client.market_tick(Instrument::Btc, Currency::Aud).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(499));

    // Fourth call waits a full interval
    let before_fourth = tokio::time::Instant::now();
    client.market_tick(Instrument::Btc, Currency::Aud).await.unwrap();
    assert!(before_fourth.elapsed() >= Duration::from_millis(999));
}
