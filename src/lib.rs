//! Irrigator controller library.
//!
//! Exposes the decision core and its adapters for integration testing.
//! GPIO access is gated behind the `rpi` feature; without it relay pins are
//! simulated in memory.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod ledger;
pub mod runner;
pub mod status;
pub mod zone;

pub mod adapters;
pub mod drivers;
pub mod pins;
