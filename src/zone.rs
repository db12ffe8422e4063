//! Per-zone watering policy.
//!
//! Two independent concerns compose here:
//!
//! ```text
//!   try_intervaled_supply()            try_supply(d)
//!           │                               │
//!   interval due? ──no──▶ false             │
//!           │ yes                           │
//!           ▼                               ▼
//!   ┌───────────────────────────────────────────────────┐
//!   │  daily-cap gate                                   │
//!   │  evict < now-window · total + d > cap ? ──▶ false │
//!   │  hold_open(d) · append event · last_supply = t    │
//!   └───────────────────────────────────────────────────┘
//!           │ accepted
//!           ▼
//!   last_intervaled_supply = t
//! ```
//!
//! The gate is the only path that actuates a valve. A declined gate never
//! resets the interval timer, so an overdue zone is retried on every poll
//! until the cap allows it or the window rolls forward.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};

use crate::app::events::{SupplyOrigin, ZoneEvent};
use crate::app::ports::{Clock, EventSink, ValvePort};
use crate::config::{DEFAULT_ROLLING_WINDOW, ZoneConfig};
use crate::ledger::{SupplyEvent, SupplyLedger};

/// Mutable per-zone record. `None` timestamps mean "never".
#[derive(Debug, Clone, Default)]
pub struct ZoneState {
    pub last_supply: Option<DateTime<Utc>>,
    pub last_intervaled_supply: Option<DateTime<Utc>>,
    pub ledger: SupplyLedger,
}

/// One independently controlled watering circuit.
pub struct Zone<V> {
    config: ZoneConfig,
    state: ZoneState,
    valve: V,
    rolling_window: Duration,
}

impl<V: ValvePort> Zone<V> {
    /// Create a zone with empty history and the default 24 h window.
    pub fn new(config: ZoneConfig, valve: V) -> Self {
        Self {
            config,
            state: ZoneState::default(),
            valve,
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }

    /// Override the rolling window (shorter windows are handy on a bench).
    pub fn with_rolling_window(mut self, window: Duration) -> Self {
        self.rolling_window = window;
        self
    }

    // ── Policy ────────────────────────────────────────────────

    /// Dispense for `duration` unless that would push the rolling total
    /// past the daily cap. Returns whether the valve was actuated.
    pub fn try_supply(
        &mut self,
        duration: Duration,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> bool {
        self.gate(duration, SupplyOrigin::Direct, clock, sink)
            .is_some()
    }

    /// Fire the configured interval supply if the interval has elapsed
    /// and the daily cap has headroom for it.
    pub fn try_intervaled_supply(&mut self, clock: &impl Clock, sink: &mut impl EventSink) -> bool {
        let Some(interval) = self.config.interval else {
            return false;
        };
        if self
            .state
            .last_intervaled_supply
            .is_some_and(|last| last > cutoff(clock.now(), interval))
        {
            return false;
        }

        let duration = self.config.intervaled_supply;
        match self.gate(duration, SupplyOrigin::Interval, clock, sink) {
            Some(finished) => {
                self.state.last_intervaled_supply = Some(finished);
                info!(
                    "Zone {} has been watered for {:?} during an intervaled supply",
                    self.config.name, duration
                );
                true
            }
            None => {
                info!(
                    "Zone {} interval has passed but it has reached the max supply amount per day",
                    self.config.name
                );
                false
            }
        }
    }

    /// The daily-cap gate. Returns the completion instant on success.
    fn gate(
        &mut self,
        duration: Duration,
        origin: SupplyOrigin,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Option<DateTime<Utc>> {
        let now = clock.now();
        self.state
            .ledger
            .evict_older_than(cutoff(now, self.rolling_window));

        let rolling_total = self.state.ledger.rolling_total();
        let projected = rolling_total.saturating_add(duration);
        debug!(
            "Zone {} projected total {:?}, cap {:?}",
            self.config.name, projected, self.config.max_supply_per_day
        );

        if projected > self.config.max_supply_per_day {
            sink.emit(&ZoneEvent::CapReached {
                zone: self.config.name.clone(),
                requested: duration,
                rolling_total,
                cap: self.config.max_supply_per_day,
            });
            return None;
        }

        sink.emit(&ZoneEvent::SupplyStarted {
            zone: self.config.name.clone(),
            duration,
        });
        self.valve.hold_open(duration);
        let finished = clock.now();

        self.state.ledger.append(SupplyEvent::new(finished, duration));
        self.state.last_supply = Some(finished);
        sink.emit(&ZoneEvent::SupplyFinished {
            zone: self.config.name.clone(),
            duration,
            at: finished,
            origin,
        });
        Some(finished)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn state(&self) -> &ZoneState {
        &self.state
    }

    pub fn valve(&self) -> &V {
        &self.valve
    }

    /// Supplied time within the rolling window ending at `now`, without
    /// evicting anything.
    pub fn rolling_total_at(&self, now: DateTime<Utc>) -> Duration {
        self.state
            .ledger
            .total_since(cutoff(now, self.rolling_window))
    }

    /// Earliest instant the next interval supply may fire. `None` when
    /// interval triggering is disabled; a zone that never watered is due
    /// immediately and reports `Some(DateTime::<Utc>::MIN_UTC)`.
    pub fn next_interval_due(&self) -> Option<DateTime<Utc>> {
        let interval = self.config.interval?;
        let Some(last) = self.state.last_intervaled_supply else {
            return Some(DateTime::<Utc>::MIN_UTC);
        };
        Some(
            TimeDelta::from_std(interval)
                .ok()
                .and_then(|d| last.checked_add_signed(d))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    // ── Persistence hooks ─────────────────────────────────────

    /// Replace the live state with one rebuilt from a snapshot.
    pub fn restore_state(&mut self, state: ZoneState) {
        self.state = state;
    }
}

/// `now - span`, clamped to the earliest representable instant.
fn cutoff(now: DateTime<Utc>, span: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(span)
        .ok()
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
