//! Port traits: the hexagonal boundary between the decision core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Zone / Runner (domain)
//! ```
//!
//! Driven adapters (relays, clocks, status storage, event sinks) implement
//! these traits. [`Zone`](crate::zone::Zone) and
//! [`Runner`](crate::runner::Runner) consume them via generics, so the core
//! never touches GPIO, the filesystem or the system clock directly.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::StatusError;
use crate::status::StatusMap;

// ───────────────────────────────────────────────────────────────
// Valve port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for one zone's valve/pump relay.
///
/// Calls are synchronous and side-effect-only. Implementations log
/// hardware faults themselves; the core never consults a result.
pub trait ValvePort {
    /// Start dispensing (drive the relay to its active level).
    fn open(&mut self);

    /// Stop dispensing.
    fn close(&mut self);

    /// Hold the valve open for exactly `duration`, then close it.
    ///
    /// This blocks the calling thread for the whole duration. The poll loop
    /// visits one zone at a time, so a dispense always runs to completion
    /// before the next zone is considered. There is no cancellation.
    fn hold_open(&mut self, duration: Duration) {
        self.open();
        std::thread::sleep(duration);
        self.close();
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source. Timestamps are persisted across restarts, so this
/// is real time rather than a monotonic uptime counter.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Status store port (driven adapter: domain ↔ persistent status)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the per-zone supply history.
///
/// Writes replace the whole mapping. Implementations SHOULD make the
/// replacement atomic so that a crash mid-write never leaves a truncated
/// file behind.
pub trait StatusStore {
    fn load(&self) -> Result<StatusMap, StatusError>;

    fn save(&mut self, statuses: &StatusMap) -> Result<(), StatusError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`ZoneEvent`](super::events::ZoneEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ZoneEvent);
}
