//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`ZoneEvent`] as a single
//! structured log line. A future MQTT or webhook adapter would implement
//! the same trait.

use log::info;

use crate::app::events::ZoneEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ZoneEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ZoneEvent) {
        match event {
            ZoneEvent::SupplyStarted { zone, duration } => {
                info!("SUPPLY | zone={} | start | duration={:?}", zone, duration);
            }
            ZoneEvent::SupplyFinished {
                zone,
                duration,
                at,
                origin,
            } => {
                info!(
                    "SUPPLY | zone={} | done | duration={:?} | at={} | origin={:?}",
                    zone,
                    duration,
                    at.to_rfc3339(),
                    origin
                );
            }
            ZoneEvent::CapReached {
                zone,
                requested,
                rolling_total,
                cap,
            } => {
                info!(
                    "CAP    | zone={} | requested={:?} | rolling={:?} | cap={:?}",
                    zone, requested, rolling_total, cap
                );
            }
        }
    }
}
