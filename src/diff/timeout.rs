//! Cooperative wall-clock budget for one diff computation.
//!
//! Algorithms call [`Deadline::tick`] from their inner loops; the clock is
//! only read every [`POLL_INTERVAL`] ticks. Once expired, a deadline stays
//! expired.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Inner-loop iterations between two clock reads.
pub const POLL_INTERVAL: u32 = 1024;

/// A per-call computation budget.
///
/// Not `Sync`: each computation owns its deadline.
#[derive(Debug)]
pub struct Deadline {
    expires_at: Option<Instant>,
    expired: Cell<bool>,
    ticks: Cell<u32>,
}

impl Deadline {
    /// A deadline that never expires.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            expires_at: None,
            expired: Cell::new(false),
            ticks: Cell::new(0),
        }
    }

    /// Expires `budget` from now. A zero budget is expired immediately.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        let deadline = Self {
            expires_at: Instant::now().checked_add(budget),
            expired: Cell::new(budget.is_zero()),
            ticks: Cell::new(0),
        };
        if budget.is_zero() {
            tracing::debug!("computation budget is zero, running degraded");
        }
        deadline
    }

    /// Budget in milliseconds.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::after(Duration::from_millis(millis))
    }

    /// Read the clock and report whether the budget is used up.
    pub fn expired(&self) -> bool {
        if self.expired.get() {
            return true;
        }
        if let Some(at) = self.expires_at
            && Instant::now() >= at
        {
            self.expired.set(true);
        }
        self.expired.get()
    }

    /// Count one unit of work; reads the clock every [`POLL_INTERVAL`] calls.
    ///
    /// Returns `true` once the deadline has expired.
    pub fn tick(&self) -> bool {
        if self.expired.get() {
            return true;
        }
        let ticks = self.ticks.get().wrapping_add(1);
        self.ticks.set(ticks);
        if ticks % POLL_INTERVAL == 0 {
            return self.expired();
        }
        false
    }

    /// Whether expiry has been observed, without reading the clock.
    #[must_use]
    pub fn was_hit(&self) -> bool {
        self.expired.get()
    }

    /// Time left, `None` when unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}
