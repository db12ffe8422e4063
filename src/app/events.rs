//! Outbound zone events.
//!
//! [`Zone`](crate::zone::Zone) emits these through the
//! [`EventSink`](super::ports::EventSink) port while it evaluates policy
//! and actuates its valve.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// What fired a supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyOrigin {
    /// The zone's interval elapsed.
    Interval,
    /// Requested directly through the daily-cap gate.
    Direct,
}

/// Structured events emitted by the decision core.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEvent {
    /// The gate accepted a request and the valve is about to open.
    SupplyStarted {
        zone: String,
        duration: Duration,
    },

    /// The valve closed and the supply was recorded.
    SupplyFinished {
        zone: String,
        duration: Duration,
        at: DateTime<Utc>,
        origin: SupplyOrigin,
    },

    /// The gate declined because the request would exceed the daily cap.
    CapReached {
        zone: String,
        requested: Duration,
        rolling_total: Duration,
        cap: Duration,
    },
}

impl ZoneEvent {
    /// Name of the zone the event concerns.
    pub fn zone(&self) -> &str {
        match self {
            Self::SupplyStarted { zone, .. }
            | Self::SupplyFinished { zone, .. }
            | Self::CapReached { zone, .. } => zone,
        }
    }
}
