//! Demo 2: Account Overview
//!
//! Showcases: signed private endpoints (read-only)
//!
//! Run: BTCMARKETS_API_KEY=... BTCMARKETS_API_SECRET=... cargo run --bin account_overview

use btcmarkets_rest::{BtcMarketsClient, ClientConfig, OrderQuery, RestError};
use btcmarkets_types::{Currency, Instrument};
use colored::*;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  ACCOUNT OVERVIEW".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let config = ClientConfig::from_env()?.with_acquire_timeout(Duration::from_secs(30));
    let client = BtcMarketsClient::with_config(config)?;
    if !client.has_credentials() {
        eprintln!(
            "{} set {} and {} to run this demo",
            "✗".red(),
            btcmarkets_auth::API_KEY_ENV,
            btcmarkets_auth::API_SECRET_ENV
        );
        return Ok(());
    }

    println!("{}", "Balances".bold());
    for balance in client.account_balance().await? {
        if balance.balance.is_positive() {
            println!("  {}  (pending {})", balance.to_string().green(), balance.pending_funds.to_decimal());
        } else {
            println!("  {}", balance.to_string().dimmed());
        }
    }
    println!();

    let fee = client.account_trading_fee(Instrument::Btc, Currency::Aud).await?;
    println!(
        "{} BTC/AUD fee rate {}%  (30 day volume {})",
        "Fees".bold(),
        fee.trading_fee_rate.to_decimal().value() * btcmarkets_types::Decimal::ONE_HUNDRED,
        fee.volume_30_day.to_decimal()
    );
    println!();

    println!("{}", "Open orders".bold());
    for instrument in Instrument::ALL {
        match client.order_open(OrderQuery::new(instrument, Currency::Aud)).await {
            Ok(list) if list.orders.is_empty() => {}
            Ok(list) => {
                for order in list.orders {
                    println!(
                        "  #{} {} {} {}/{} {} @ {} ({})",
                        order.id,
                        order.order_side,
                        order.order_type,
                        order.instrument,
                        order.currency,
                        order.open_volume.to_decimal(),
                        order.price.to_decimal(),
                        order.status.to_string().yellow()
                    );
                }
            }
            Err(RestError::Exchange { message, .. }) => {
                println!("  {} {}: {}", "✗".red(), instrument, message);
            }
            Err(err) => return Err(err.into()),
        }
    }

    client.shutdown();
    println!("\n{} Done.", "✓".green());
    Ok(())
}
