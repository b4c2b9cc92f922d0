//! Demo 3: Rate Gate
//!
//! Showcases: token-bucket pacing, burst capacity, bounded waits
//!
//! Run: cargo run --bin rate_gate
//! Logging: RUST_LOG=btcmarkets_rest=trace cargo run --bin rate_gate

use btcmarkets_rest::{RateGate, RateGateError};
use colored::*;
use std::time::Duration;
use tokio::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

const INTERVAL: Duration = Duration::from_millis(250);
const BURST: u32 = 4;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  RATE GATE".cyan().bold());
    println!(
        "{}",
        format!("  one permit every {:?}, burst {}", INTERVAL, BURST).cyan()
    );
    println!("{}", "═".repeat(60).cyan());
    println!();

    let gate = RateGate::start(INTERVAL, BURST)?;

    match gate.try_acquire() {
        Err(RateGateError::Exhausted) => println!("{} buffer starts empty", "✓".green()),
        other => println!("{} unexpected: {:?}", "✗".red(), other),
    }

    // Let the burst capacity build up
    tokio::time::sleep(INTERVAL * (BURST + 1)).await;
    println!("{} {} permits banked", "✓".green(), gate.available());

    let start = Instant::now();
    let mut handles = Vec::new();
    for caller in 0..(BURST * 2) {
        let gate = gate.clone();
        handles.push(tokio::spawn(async move {
            let permit = gate.acquire().await?;
            Ok::<_, RateGateError>((caller, permit.sequence(), start.elapsed()))
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await??);
    }
    results.sort_by_key(|(_, _, elapsed)| *elapsed);

    for (caller, sequence, elapsed) in results {
        let label = if elapsed < INTERVAL / 2 { "burst".green() } else { "paced".yellow() };
        println!(
            "  caller {:>2}  permit #{:<3} after {:>7.1?}  {}",
            caller, sequence, elapsed, label
        );
    }

    match gate.acquire_timeout(Duration::from_millis(10)).await {
        Err(RateGateError::Timeout(deadline)) => {
            println!("\n{} no permit within {:?}", "✓".green(), deadline)
        }
        other => println!("\n{} unexpected: {:?}", "✗".red(), other),
    }

    gate.stop();
    println!("{} gate stopped", "✓".green());
    Ok(())
}
