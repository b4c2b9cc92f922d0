//! Demo 1: Market Watch
//!
//! Showcases: public market data endpoints, whole/decimal amounts
//!
//! Run: cargo run --bin market_watch [INSTRUMENT]
//! Logging: RUST_LOG=btcmarkets_rest=debug cargo run --bin market_watch

use btcmarkets_rest::BtcMarketsClient;
use btcmarkets_types::{Currency, Instrument};
use colored::*;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let instrument: Instrument = match std::env::args().nth(1) {
        Some(arg) => arg.to_uppercase().parse()?,
        None => Instrument::Btc,
    };
    let currency = Currency::Aud;

    println!("{}", "═".repeat(60).cyan());
    println!("{}", format!("  MARKET WATCH  {}/{}", instrument, currency).cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = BtcMarketsClient::new()?;

    let tick = client.market_tick(instrument, currency).await?;
    let time = chrono::DateTime::from_timestamp(tick.timestamp, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| tick.timestamp.to_string());
    println!("{} {}", "Tick at".dimmed(), time);
    println!(
        "  {} ${}  {} ${}  {} ${}",
        "BID:".yellow(),
        tick.best_bid,
        "ASK:".yellow(),
        tick.best_ask,
        "SPREAD:".green(),
        tick.spread()
    );
    println!("  {} ${}  {} {}", "LAST:".yellow(), tick.last_price, "24h VOL:".yellow(), tick.volume_24h);
    println!();

    let book = client.market_orderbook(instrument, currency).await?;
    println!("{}", "Top of book".bold());
    for level in book.asks.iter().take(5).rev() {
        println!("  {:>14}  {}", level.price().to_string().red(), level.volume());
    }
    println!("  {}", "─".repeat(30).dimmed());
    for level in book.bids.iter().take(5) {
        println!("  {:>14}  {}", level.price().to_string().green(), level.volume());
    }
    println!();

    let trades = client.market_trades(instrument, currency, None).await?;
    println!("{} ({} trades)", "Recent trades".bold(), trades.len());
    for line in trades.describe().lines().take(10) {
        println!("  {}", line);
    }

    println!("\n{} Done.", "✓".green());
    Ok(())
}
