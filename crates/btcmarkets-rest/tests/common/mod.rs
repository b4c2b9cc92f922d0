//! Common test utilities and fixtures for integration tests
//!
//! Response bodies follow the shapes returned by the live BTC Markets API.

#![allow(dead_code)]

use std::sync::Arc;

use btcmarkets_auth::Credentials;
use btcmarkets_rest::{BtcMarketsClient, ClientConfig, MockTransport};
use btcmarkets_types::RateLimitConfig;

/// base64("btcmarkets-test-secret-0123456789")
pub const TEST_SECRET: &str = "YnRjbWFya2V0cy10ZXN0LXNlY3JldC0wMTIzNDU2Nzg5";

pub const TEST_API_KEY: &str = "test-api-key";

pub const BASE_URL: &str = "https://fixture.test";

/// GET /market/BTC/AUD/tick
pub const TICK_RESPONSE: &str = r#"{
    "bestBid": 4210.01,
    "bestAsk": 4219.99,
    "lastPrice": 4215.5,
    "currency": "AUD",
    "instrument": "BTC",
    "timestamp": 1500000000,
    "volume24h": 187.32651943
}"#;

/// GET /market/BTC/AUD/orderbook
pub const ORDERBOOK_RESPONSE: &str = r#"{
    "currency": "AUD",
    "instrument": "BTC",
    "timestamp": 1500000000,
    "asks": [[4219.99, 0.5], [4220.0, 1.25], [4225.5, 3.0]],
    "bids": [[4210.01, 0.1], [4210.0, 2.0], [4200.0, 10.0]]
}"#;

/// GET /market/BTC/AUD/trades
pub const TRADES_RESPONSE: &str = r#"[
    {"tid": 4432702312, "amount": 0.01, "price": 4215.5, "date": 1500000000},
    {"tid": 4432702311, "amount": 1.5, "price": 4210, "date": 1499999990}
]"#;

/// GET /account/balance
pub const BALANCE_RESPONSE: &str = r#"[
    {"currency": "AUD", "balance": 100000000000, "pendingFunds": 2500000000},
    {"currency": "BTC", "balance": 12345678, "pendingFunds": 0},
    {"currency": "ETH", "balance": 0, "pendingFunds": 0}
]"#;

/// POST /order/create, accepted
pub const ORDER_CREATED_RESPONSE: &str = r#"{
    "success": true,
    "errorCode": null,
    "errorMessage": null,
    "id": 1003245675,
    "clientRequestId": "abc-cdf-1000"
}"#;

/// POST /order/create, rejected
pub const ORDER_REJECTED_RESPONSE: &str = r#"{
    "success": false,
    "errorCode": 3,
    "errorMessage": "insufficient funds",
    "id": 0,
    "clientRequestId": "abc-cdf-1000"
}"#;

/// POST /order/history
pub const ORDER_HISTORY_RESPONSE: &str = r#"{
    "success": true,
    "errorCode": null,
    "errorMessage": null,
    "orders": [
        {
            "id": 1003245675,
            "currency": "AUD",
            "instrument": "BTC",
            "orderSide": "Bid",
            "ordertype": "Limit",
            "creationTime": 1500000000000,
            "status": "Fully Matched",
            "errorMessage": null,
            "price": 421000000000,
            "volume": 10000000,
            "openVolume": 0,
            "clientRequestId": "abc-cdf-1000",
            "trades": [
                {
                    "id": 1003245701,
                    "creationTime": 1500000000500,
                    "description": null,
                    "price": 421000000000,
                    "volume": 10000000,
                    "fee": 3578500
                }
            ]
        },
        {
            "id": 1003245680,
            "currency": "AUD",
            "instrument": "BTC",
            "orderSide": "Ask",
            "ordertype": "Limit",
            "creationTime": 1500000100000,
            "status": "Cancelled",
            "errorMessage": null,
            "price": 450000000000,
            "volume": 5000000,
            "openVolume": 5000000,
            "clientRequestId": null,
            "trades": []
        }
    ]
}"#;

/// Empty mock transport, shared with the client under test
pub fn mock_transport() -> Arc<MockTransport> {
    Arc::new(MockTransport::new())
}

pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_API_KEY, TEST_SECRET).expect("valid test credentials")
}

/// Route client logs to the test harness; set `RUST_LOG` to see them
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client wired to `transport` with fast rate gates
pub fn fixture_client(transport: &Arc<MockTransport>, credentials: Option<Credentials>) -> BtcMarketsClient {
    init_tracing();
    let mut config = ClientConfig::new()
        .with_base_url(BASE_URL)
        .with_rate_limits(RateLimitConfig::permissive());
    if let Some(credentials) = credentials {
        config = config.with_credentials(credentials);
    }
    BtcMarketsClient::with_transport(config, transport.clone()).expect("client construction")
}
