//! Application boundary: ports and the events that cross them.
//!
//! The decision core ([`ledger`](crate::ledger), [`zone`](crate::zone),
//! [`status`](crate::status)) talks to relays, clocks and storage only
//! through the **port traits** defined in [`ports`], keeping it fully
//! testable without a Raspberry Pi.

pub mod events;
pub mod ports;
