//! Mock adapters for integration tests.
//!
//! Records every valve call so tests can assert on the full actuation
//! history without touching GPIO, and lets tests drive the clock and the
//! status store from outside the runner.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use irrigator::app::events::ZoneEvent;
use irrigator::app::ports::{Clock, EventSink, StatusStore, ValvePort};
use irrigator::config::ZoneConfig;
use irrigator::error::StatusError;
use irrigator::status::StatusMap;

// ── Valve call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ValveCall {
    Open,
    Close,
    HoldOpen(Duration),
}

// ── MockValve ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockValve {
    pub calls: Vec<ValveCall>,
}

#[allow(dead_code)]
impl MockValve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispensed(&self) -> Vec<Duration> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ValveCall::HoldOpen(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl ValvePort for MockValve {
    fn open(&mut self) {
        self.calls.push(ValveCall::Open);
    }

    fn close(&mut self) {
        self.calls.push(ValveCall::Close);
    }

    fn hold_open(&mut self, duration: Duration) {
        self.calls.push(ValveCall::HoldOpen(duration));
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Shared clock that tests advance by hand.
#[derive(Clone)]
pub struct ManualClock(Rc<Cell<DateTime<Utc>>>);

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(
            DateTime::from_timestamp(1_714_550_400, 0).unwrap(),
        )))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + TimeDelta::from_std(by).unwrap());
    }

    pub fn ago(&self, by: Duration) -> DateTime<Utc> {
        self.0.get() - TimeDelta::from_std(by).unwrap()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

// ── MemStore ──────────────────────────────────────────────────

/// In-memory status store. Clones share the same backing map.
#[derive(Clone, Default)]
pub struct MemStore {
    pub saved: Rc<RefCell<Option<StatusMap>>>,
    pub saves: Rc<Cell<usize>>,
    pub fail_saves: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(statuses: StatusMap) -> Self {
        let store = Self::default();
        *store.saved.borrow_mut() = Some(statuses);
        store
    }

    pub fn snapshot(&self) -> Option<StatusMap> {
        self.saved.borrow().clone()
    }
}

impl StatusStore for MemStore {
    fn load(&self) -> Result<StatusMap, StatusError> {
        self.saved.borrow().clone().ok_or_else(|| StatusError::Read {
            path: "mem".into(),
            source: std::io::ErrorKind::NotFound.into(),
        })
    }

    fn save(&mut self, statuses: &StatusMap) -> Result<(), StatusError> {
        if self.fail_saves.get() {
            return Err(StatusError::Write {
                path: "mem".into(),
                source: std::io::ErrorKind::PermissionDenied.into(),
            });
        }
        *self.saved.borrow_mut() = Some(statuses.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ZoneEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ZoneEvent) {
        self.events.push(event.clone());
    }
}

// ── Config helpers ────────────────────────────────────────────

#[allow(dead_code)]
pub fn zone_config(name: &str, interval_secs: u64, supply_secs: u64, cap_secs: u64) -> ZoneConfig {
    ZoneConfig {
        name: name.to_string(),
        interval: (interval_secs > 0).then(|| Duration::from_secs(interval_secs)),
        intervaled_supply: Duration::from_secs(supply_secs),
        max_supply_per_day: Duration::from_secs(cap_secs),
        relay_pin: 17,
    }
}
