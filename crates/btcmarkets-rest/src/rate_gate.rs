//! Token-bucket rate gate
//!
//! A background ticker deposits one [`Permit`] every `interval` into a
//! buffer holding at most `burst` permits. Callers take permits out of the
//! buffer, waiting when it is empty. The buffer starts empty, so burst
//! capacity has to build up before it can be spent.
//!
//! The producer never blocks: a permit minted while the buffer is full is
//! discarded. This caps the long-run call rate at `1 / interval` while
//! allowing up to `burst` back-to-back calls once the buffer has filled.
//!
//! The gate owns its ticker task. Calling [`RateGate::stop`] or dropping the
//! last clone of the gate aborts the ticker; once the remaining permits are
//! drained every waiter fails with [`RateGateError::Closed`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use btcmarkets_types::RateGateConfig;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, instrument, trace};

/// Rate gate errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateGateError {
    /// Burst capacity must be at least one permit
    #[error("burst must be at least 1")]
    InvalidBurst,

    /// Interval must be non-zero
    #[error("permit interval must be greater than zero")]
    InvalidInterval,

    /// The gate was started outside a tokio runtime
    #[error("rate gate requires a running tokio runtime")]
    NoRuntime,

    /// No permit is currently available
    #[error("no permit available")]
    Exhausted,

    /// No permit arrived before the deadline
    #[error("no permit available within {0:?}")]
    Timeout(Duration),

    /// The gate was stopped and its buffer is drained
    #[error("rate gate is closed")]
    Closed,
}

/// One unit of rate-limited call allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    sequence: u64,
    issued_at: Instant,
}

impl Permit {
    /// Position of this permit in the ticker's output (gaps mark discarded permits)
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// When the ticker minted this permit
    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }
}

struct GateInner {
    permits: Mutex<mpsc::Receiver<Permit>>,
    /// Upper bound on buffered permits, for introspection only
    banked: Arc<AtomicU64>,
    ticker: JoinHandle<()>,
    config: RateGateConfig,
}

impl Drop for GateInner {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

/// Token-bucket rate gate shared by every caller of one rate class
///
/// Cloning is cheap and yields a handle to the same gate.
#[derive(Clone)]
pub struct RateGate {
    inner: Arc<GateInner>,
}

impl RateGate {
    /// Start a gate producing one permit every `interval`, banking up to `burst`
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(interval: Duration, burst: u32) -> Result<Self, RateGateError> {
        Self::with_config(RateGateConfig::new(interval, burst))
    }

    /// Start a gate from a [`RateGateConfig`]
    pub fn with_config(config: RateGateConfig) -> Result<Self, RateGateError> {
        if config.burst == 0 {
            return Err(RateGateError::InvalidBurst);
        }
        if config.interval.is_zero() {
            return Err(RateGateError::InvalidInterval);
        }
        let handle = tokio::runtime::Handle::try_current().map_err(|_| RateGateError::NoRuntime)?;

        let (tx, rx) = mpsc::channel(config.burst as usize);
        let banked = Arc::new(AtomicU64::new(0));
        let ticker = handle.spawn(run_ticker(tx, config.interval, Arc::clone(&banked)));

        debug!(interval = ?config.interval, burst = config.burst, "rate gate started");

        Ok(Self {
            inner: Arc::new(GateInner {
                permits: Mutex::new(rx),
                banked,
                ticker,
                config,
            }),
        })
    }

    /// Wait until a permit is available and consume it
    ///
    /// Waiters are served in the order the internal lock grants access.
    #[instrument(skip(self), level = "trace", fields(burst = self.inner.config.burst))]
    pub async fn acquire(&self) -> Result<Permit, RateGateError> {
        let mut permits = self.inner.permits.lock().await;
        let permit = permits.recv().await.ok_or(RateGateError::Closed)?;
        self.inner.banked.fetch_sub(1, Ordering::AcqRel);
        Ok(permit)
    }

    /// Like [`acquire`](Self::acquire), giving up after `deadline`
    ///
    /// A caller that times out consumes nothing.
    pub async fn acquire_timeout(&self, deadline: Duration) -> Result<Permit, RateGateError> {
        tokio::time::timeout(deadline, self.acquire())
            .await
            .map_err(|_| RateGateError::Timeout(deadline))?
    }

    /// Consume a permit only if one is available right now
    pub fn try_acquire(&self) -> Result<Permit, RateGateError> {
        let mut permits = self
            .inner
            .permits
            .try_lock()
            .map_err(|_| RateGateError::Exhausted)?;

        match permits.try_recv() {
            Ok(permit) => {
                self.inner.banked.fetch_sub(1, Ordering::AcqRel);
                Ok(permit)
            }
            Err(TryRecvError::Empty) => Err(RateGateError::Exhausted),
            Err(TryRecvError::Disconnected) => Err(RateGateError::Closed),
        }
    }

    /// Number of permits currently banked
    pub fn available(&self) -> u32 {
        let banked = self.inner.banked.load(Ordering::Acquire);
        banked.min(u64::from(self.inner.config.burst)) as u32
    }

    /// Burst capacity
    pub fn burst(&self) -> u32 {
        self.inner.config.burst
    }

    /// Steady-state interval between permits
    pub fn interval(&self) -> Duration {
        self.inner.config.interval
    }

    /// Returns true while the ticker is producing permits
    pub fn is_running(&self) -> bool {
        !self.inner.ticker.is_finished()
    }

    /// Stop producing permits
    ///
    /// Permits already banked can still be acquired; afterwards every
    /// acquisition fails with [`RateGateError::Closed`].
    pub fn stop(&self) {
        debug!(interval = ?self.inner.config.interval, "rate gate stopped");
        self.inner.ticker.abort();
    }
}

impl std::fmt::Debug for RateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGate")
            .field("interval", &self.inner.config.interval)
            .field("burst", &self.inner.config.burst)
            .field("available", &self.available())
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_ticker(tx: mpsc::Sender<Permit>, interval: Duration, banked: Arc<AtomicU64>) {
    // First permit one interval after start
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut sequence = 0u64;
    loop {
        let issued_at = ticker.tick().await;
        let permit = Permit { sequence, issued_at };
        sequence += 1;

        // Count before sending so `banked` never undercounts a receiver's decrement
        banked.fetch_add(1, Ordering::AcqRel);
        match tx.try_send(permit) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                banked.fetch_sub(1, Ordering::AcqRel);
                trace!(sequence = permit.sequence, "permit buffer full, permit discarded");
            }
            Err(TrySendError::Closed(_)) => {
                banked.fetch_sub(1, Ordering::AcqRel);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn test_rejects_invalid_config() {
        assert_eq!(RateGate::start(INTERVAL, 0).unwrap_err(), RateGateError::InvalidBurst);
        assert_eq!(
            RateGate::start(Duration::ZERO, 5).unwrap_err(),
            RateGateError::InvalidInterval
        );
    }

    #[test]
    fn test_requires_runtime() {
        assert_eq!(RateGate::start(INTERVAL, 5).unwrap_err(), RateGateError::NoRuntime);
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_empty() {
        let gate = RateGate::start(INTERVAL, 5).unwrap();
        assert_eq!(gate.available(), 0);
        assert_eq!(gate.try_acquire().unwrap_err(), RateGateError::Exhausted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_permit_after_one_interval() {
        let gate = RateGate::start(INTERVAL, 5).unwrap();
        let start = Instant::now();

        let permit = gate.acquire().await.unwrap();

        assert!(start.elapsed() >= INTERVAL && start.elapsed() < INTERVAL * 2);
        assert_eq!(permit.sequence(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_buffer_never_exceeds_burst() {
        let burst = 3;
        let gate = RateGate::start(INTERVAL, burst).unwrap();

        tokio::time::sleep(INTERVAL * 10 + Duration::from_millis(1)).await;
        assert_eq!(gate.available(), burst);

        for _ in 0..burst {
            gate.try_acquire().unwrap();
        }
        assert_eq!(gate.try_acquire().unwrap_err(), RateGateError::Exhausted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_then_block() {
        let burst = 4;
        let gate = RateGate::start(INTERVAL, burst).unwrap();

        // Fill the buffer; the permit minted at (burst + 1) * INTERVAL is discarded
        tokio::time::sleep(INTERVAL * (burst + 1) + Duration::from_millis(1)).await;

        let start = Instant::now();
        for _ in 0..burst {
            gate.acquire().await.unwrap();
        }
        assert_eq!(start.elapsed(), Duration::ZERO, "banked permits must not block");

        gate.acquire().await.unwrap();
        assert!(
            start.elapsed() >= INTERVAL - Duration::from_millis(1),
            "burst + 1 acquisition should wait roughly one interval, waited {:?}",
            start.elapsed()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_steady_state_rate() {
        let gate = RateGate::start(INTERVAL, 1).unwrap();
        let start = Instant::now();

        for _ in 0..5 {
            gate.acquire().await.unwrap();
        }

        assert!(start.elapsed() >= INTERVAL * 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_get_unique_permits() {
        let gate = RateGate::start(Duration::from_millis(10), 4).unwrap();
        let callers = 40;

        let mut handles = Vec::with_capacity(callers);
        for _ in 0..callers {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move { gate.acquire().await }));
        }

        let mut sequences = HashSet::new();
        for handle in handles {
            let permit = handle.await.unwrap().unwrap();
            assert!(sequences.insert(permit.sequence()), "permit consumed twice");
        }
        assert_eq!(sequences.len(), callers);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_timeout() {
        let gate = RateGate::start(Duration::from_secs(10), 1).unwrap();

        let err = gate.acquire_timeout(Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(err, RateGateError::Timeout(Duration::from_secs(1)));

        // The timed-out caller did not consume the permit that arrives later
        let permit = gate.acquire_timeout(Duration::from_secs(10)).await.unwrap();
        assert_eq!(permit.sequence(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_closes_gate_after_drain() {
        let gate = RateGate::start(INTERVAL, 2).unwrap();
        tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(1)).await;

        gate.stop();

        // Banked permits survive the stop
        gate.acquire().await.unwrap();
        gate.acquire().await.unwrap();
        assert_eq!(gate.acquire().await.unwrap_err(), RateGateError::Closed);
        assert!(!gate.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticker() {
        let gate = RateGate::start(INTERVAL, 2).unwrap();
        let banked = Arc::clone(&gate.inner.banked);
        drop(gate);

        tokio::time::sleep(INTERVAL * 5).await;
        assert_eq!(banked.load(Ordering::Acquire), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_accessors() {
        let gate = RateGate::start(INTERVAL, 7).unwrap();
        assert_eq!(gate.burst(), 7);
        assert_eq!(gate.interval(), INTERVAL);
        assert!(gate.is_running());
        assert!(format!("{:?}", gate).contains("burst: 7"));
    }
}
