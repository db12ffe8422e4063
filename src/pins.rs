//! Relay output pins.
//!
//! Zone configs carry BCM GPIO numbers; this module turns them into
//! [`embedded_hal`] output pins.
//!
//! ## Dual-target design
//!
//! With the `rpi` feature: real pins through `rppal`, opened HIGH so the
//! relay stays released until a zone waters.
//! Without it: [`SimPin`] tracks the level in memory and logs transitions,
//! so the whole controller runs on a workstation.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use log::debug;

#[cfg(feature = "rpi")]
pub type RelayPin = rppal::gpio::OutputPin;

#[cfg(not(feature = "rpi"))]
pub type RelayPin = SimPin;

/// Open BCM pin `bcm` as a relay output.
#[cfg(feature = "rpi")]
pub fn open_relay_pin(bcm: u8) -> anyhow::Result<RelayPin> {
    use anyhow::Context;

    let gpio = rppal::gpio::Gpio::new().context("failed to open GPIO peripheral")?;
    let pin = gpio
        .get(bcm)
        .with_context(|| format!("failed to claim GPIO{bcm}"))?;
    Ok(pin.into_output_high())
}

/// Open BCM pin `bcm` as a simulated relay output.
#[cfg(not(feature = "rpi"))]
pub fn open_relay_pin(bcm: u8) -> anyhow::Result<RelayPin> {
    debug!("GPIO{}: simulated output", bcm);
    Ok(SimPin::new(bcm))
}

// ---------------------------------------------------------------------------
// Simulated pin
// ---------------------------------------------------------------------------

/// In-memory output pin for host runs and tests.
#[derive(Debug)]
pub struct SimPin {
    bcm: u8,
    level: PinState,
}

impl SimPin {
    pub fn new(bcm: u8) -> Self {
        Self {
            bcm,
            level: PinState::High,
        }
    }

    pub fn bcm(&self) -> u8 {
        self.bcm
    }

    pub fn level(&self) -> PinState {
        self.level
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        debug!("GPIO{} -> LOW", self.bcm);
        self.level = PinState::Low;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        debug!("GPIO{} -> HIGH", self.bcm);
        self.level = PinState::High;
        Ok(())
    }
}
