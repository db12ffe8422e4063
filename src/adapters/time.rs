//! System clock adapter.
//!
//! Supply timestamps outlive the process, so they come from the wall
//! clock rather than a monotonic uptime counter. On a Raspberry Pi without
//! an RTC the clock is only trustworthy once NTP has synced; the daily cap
//! errs on the side of under-watering if it jumps forward at boot.

use chrono::{DateTime, Utc};

use crate::app::ports::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
