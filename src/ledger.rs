//! Supply history ledger.
//!
//! A fixed-capacity ring of the most recent [`SupplyEvent`]s for one zone.
//! The daily-cap gate reads its rolling total on every check, so the ledger
//! must hold enough history to cover the rolling window for any realistic
//! watering cadence without growing unbounded under an always-on poller.
//!
//! ```text
//!   tail (oldest)                                   head (newest)
//!   ┌──────┬──────┬──────┬─────────────────────┬──────┐
//!   │ e0   │ e1   │ e2   │        ...          │ eN   │  ◀── append
//!   └──────┴──────┴──────┴─────────────────────┴──────┘
//!      │
//!      └──▶ evicted on overflow (capacity) or by evict_older_than (time)
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Number of supply events retained per zone.
pub const LEDGER_CAPACITY: usize = 100;

/// One completed dispense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyEvent {
    /// Instant the dispense finished.
    pub timestamp: DateTime<Utc>,
    /// How long the valve was held open.
    pub duration: Duration,
}

impl SupplyEvent {
    pub fn new(timestamp: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            timestamp,
            duration,
        }
    }
}

/// Bounded, time-ordered log of supply events.
///
/// Events are appended only when a dispense completes, so insertion order is
/// time order and eviction from the front always removes the oldest entry.
#[derive(Debug, Clone, Default)]
pub struct SupplyLedger {
    events: heapless::Deque<SupplyEvent, LEDGER_CAPACITY>,
}

impl SupplyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, evicting the oldest one first when full.
    pub fn append(&mut self, event: SupplyEvent) {
        if self.events.is_full() {
            self.events.pop_front();
        }
        // Cannot fail: a slot was freed above if the ring was full.
        let _ = self.events.push_back(event);
    }

    /// Drop events whose timestamp is strictly before `cutoff`.
    ///
    /// Returns the number of events evicted.
    pub fn evict_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let mut evicted = 0;
        while self
            .events
            .front()
            .is_some_and(|oldest| oldest.timestamp < cutoff)
        {
            self.events.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Sum of durations over every retained event.
    pub fn rolling_total(&self) -> Duration {
        self.events
            .iter()
            .fold(Duration::ZERO, |acc, e| acc.saturating_add(e.duration))
    }

    /// Sum of durations over retained events at or after `cutoff`,
    /// without evicting anything.
    pub fn total_since(&self, cutoff: DateTime<Utc>) -> Duration {
        self.events
            .iter()
            .filter(|e| e.timestamp >= cutoff)
            .fold(Duration::ZERO, |acc, e| acc.saturating_add(e.duration))
    }

    /// Retained events, oldest first.
    pub fn snapshot(&self) -> Vec<SupplyEvent> {
        self.events.iter().copied().collect()
    }

    /// Rebuild history from a persisted sequence (oldest first).
    ///
    /// Uses the same overflow rule as [`append`](Self::append), so a
    /// sequence longer than the capacity keeps only its newest events.
    pub fn restore<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = SupplyEvent>,
    {
        for event in events {
            self.append(event);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SupplyEvent> {
        self.events.iter()
    }

    /// Most recent event, if any.
    pub fn latest(&self) -> Option<&SupplyEvent> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.events.is_full()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
