//! Injectable time sources.
//!
//! The store never reads the system clock or sleeps directly.  Timestamps
//! come from a [`Clock`] and the emulated network latency of each operation
//! comes from a [`LatencyPolicy`], so tests can run deterministically with
//! [`SteppingClock`] and [`NoLatency`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// Source of timestamps for created entities.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock: reads the system time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock: starts at a fixed instant and advances one second per call,
/// so insertion-order timestamps are strictly increasing and reproducible.
#[derive(Debug)]
pub struct SteppingClock {
    base: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            base: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        self.base + chrono::Duration::seconds(tick)
    }
}

/// Store operations that carry emulated latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Login,
    Register,
    Logout,
    DeleteAccount,
    SearchUsers,
    CreateChat,
}

/// Maps each operation to the artificial delay awaited before it runs.
pub trait LatencyPolicy: Send + Sync {
    fn duration_for(&self, op: StoreOp) -> Duration;
}

/// Latency profile emulating a remote backend.
#[derive(Debug, Default)]
pub struct SimulatedLatency;

impl LatencyPolicy for SimulatedLatency {
    fn duration_for(&self, op: StoreOp) -> Duration {
        let millis = match op {
            StoreOp::Login => 600,
            StoreOp::Register => 800,
            StoreOp::Logout => 300,
            StoreOp::DeleteAccount => 1000,
            StoreOp::SearchUsers => 300,
            StoreOp::CreateChat => 500,
        };
        Duration::from_millis(millis)
    }
}

/// Zero latency, for deterministic tests.
#[derive(Debug, Default)]
pub struct NoLatency;

impl LatencyPolicy for NoLatency {
    fn duration_for(&self, _op: StoreOp) -> Duration {
        Duration::ZERO
    }
}
