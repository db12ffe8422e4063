//! Pump/valve relay driver.
//!
//! The relay boards used for irrigation (4- and 8-channel SRD-05VDC
//! modules) energise a channel when its input is pulled LOW, so this
//! driver treats LOW as "water flowing" and HIGH as "off".
//!
//! ## Safety contract
//!
//! The relay must never be left energised when the driver goes away. `Drop`
//! releases the channel, so an early return or panic in the poll loop
//! still shuts the pump off.
//!
//! Pin write failures are logged and otherwise ignored. The daily-cap gate
//! has already recorded the intent; there is no retry path.

use embedded_hal::digital::OutputPin;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Released,
    Energised,
}

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    state: RelayState,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Wrap `pin` and drive it to the released (HIGH) level.
    pub fn new(pin: P) -> Self {
        let mut relay = Self {
            pin,
            state: RelayState::Energised,
        };
        relay.release();
        relay
    }

    pub fn energise(&mut self) {
        if let Err(e) = self.pin.set_low() {
            warn!("Relay: set_low failed: {:?}", e);
        }
        self.state = RelayState::Energised;
    }

    pub fn release(&mut self) {
        if let Err(e) = self.pin.set_high() {
            warn!("Relay: set_high failed: {:?}", e);
        }
        self.state = RelayState::Released;
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn is_energised(&self) -> bool {
        self.state == RelayState::Energised
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: OutputPin> Drop for RelayDriver<P> {
    fn drop(&mut self) {
        if self.is_energised() {
            self.release();
        }
    }
}
