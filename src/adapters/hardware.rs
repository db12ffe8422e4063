//! Hardware adapter. Bridges a zone's relay to the [`ValvePort`].
//!
//! This is the only place a zone's water actually starts and stops.
//! Dispense start and finish are logged by the event sink; this adapter
//! only traces relay transitions at debug level.
//!
//! `hold_open` (the port's default) blocks the poll loop for the whole
//! dispense: zones are checked one at a time, and the next zone is not
//! considered until this one's valve has closed again.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::ValvePort;
use crate::drivers::relay::RelayDriver;

/// Concrete [`ValvePort`] for one zone.
pub struct RelayValve<P: OutputPin> {
    zone: String,
    relay: RelayDriver<P>,
}

impl<P: OutputPin> RelayValve<P> {
    pub fn new(zone: impl Into<String>, pin: P) -> Self {
        Self {
            zone: zone.into(),
            relay: RelayDriver::new(pin),
        }
    }

    pub fn relay(&self) -> &RelayDriver<P> {
        &self.relay
    }
}

impl<P: OutputPin> ValvePort for RelayValve<P> {
    fn open(&mut self) {
        debug!("Relay {}: energise", self.zone);
        self.relay.energise();
    }

    fn close(&mut self) {
        debug!("Relay {}: release", self.zone);
        self.relay.release();
    }
}
