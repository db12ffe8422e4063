//! Poll loop.
//!
//! Owns every zone and the ports they share. Each sweep visits the zones
//! one at a time, asks each to check its interval policy, and rewrites
//! the status file only when at least one zone actually watered.
//!
//! ```text
//!   ┌──────────── run() ─────────────────────────────────────┐
//!   │ loop {                                                 │
//!   │   sweep():  for zone in zones (name order) {           │
//!   │               sleep(zone_gap)                          │
//!   │               acted |= zone.try_intervaled_supply()    │
//!   │             }                                          │
//!   │   if acted { persist() }                               │
//!   │   sleep(check_interval)                                │
//!   │ }                                                      │
//!   └────────────────────────────────────────────────────────┘
//! ```
//!
//! A crash between a dispense and the following persist loses at most one
//! sweep of history.

use std::collections::BTreeMap;

use log::{debug, error, info, warn};

use crate::app::ports::{Clock, EventSink, StatusStore, ValvePort};
use crate::config::{RunnerSettings, ZoneConfig};
use crate::status::{self, StatusMap};
use crate::zone::Zone;

/// Outcome of restoring persisted history at startup.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// Zones whose history was rebuilt.
    pub restored: Vec<String>,
    /// Persisted zones with no matching config (ignored).
    pub unknown: Vec<String>,
}

pub struct Runner<V, C, S, E> {
    zones: BTreeMap<String, Zone<V>>,
    clock: C,
    store: S,
    sink: E,
    settings: RunnerSettings,
    sweeps: u64,
}

impl<V, C, S, E> Runner<V, C, S, E>
where
    V: ValvePort,
    C: Clock,
    S: StatusStore,
    E: EventSink,
{
    /// Build a runner. Zones are keyed by name; config loading has
    /// already rejected duplicates.
    pub fn new(
        zones: impl IntoIterator<Item = Zone<V>>,
        clock: C,
        store: S,
        sink: E,
        settings: RunnerSettings,
    ) -> Self {
        let zones = zones
            .into_iter()
            .map(|z| (z.name().to_string(), z))
            .collect();
        Self {
            zones,
            clock,
            store,
            sink,
            settings,
            sweeps: 0,
        }
    }

    // ── Startup ───────────────────────────────────────────────

    /// Load persisted history from the store. A missing or malformed
    /// file is not fatal: every zone simply starts with empty history.
    pub fn load_statuses(&mut self) -> RestoreReport {
        match self.store.load() {
            Ok(statuses) => self.restore(statuses),
            Err(e) if e.is_missing() => {
                warn!("No status file yet ({}), starting with empty status", e);
                RestoreReport::default()
            }
            Err(e) => {
                warn!("Status file failed to load ({}), starting with empty status", e);
                RestoreReport::default()
            }
        }
    }

    /// Rebuild zone state for every persisted zone that is also configured.
    pub fn restore(&mut self, statuses: StatusMap) -> RestoreReport {
        let mut report = RestoreReport::default();
        for (name, snapshot) in statuses {
            match self.zones.get_mut(&name) {
                Some(zone) => {
                    zone.restore_state(status::unpack(snapshot));
                    info!(
                        "Loaded status for zone {} ({} events)",
                        name,
                        zone.state().ledger.len()
                    );
                    report.restored.push(name);
                }
                None => {
                    debug!("Ignoring status for unconfigured zone {}", name);
                    report.unknown.push(name);
                }
            }
        }
        report
    }

    // ── Sweep ─────────────────────────────────────────────────

    /// Check every zone once. Returns whether any zone watered.
    ///
    /// Every zone is visited even after an earlier one acted.
    pub fn sweep(&mut self) -> bool {
        self.sweeps += 1;
        let mut supplied = false;
        for zone in self.zones.values_mut() {
            if !self.settings.zone_gap.is_zero() {
                std::thread::sleep(self.settings.zone_gap);
            }
            info!("Checking zone {}", zone.name());
            supplied |= zone.try_intervaled_supply(&self.clock, &mut self.sink);
        }
        supplied
    }

    /// Snapshot every zone.
    pub fn compact_all(&self) -> StatusMap {
        self.zones
            .iter()
            .map(|(name, zone)| (name.clone(), status::compact(zone.state())))
            .collect()
    }

    /// Write all zone snapshots to the store. Failures are logged; the
    /// next active sweep tries again.
    pub fn persist(&mut self) -> bool {
        let statuses = self.compact_all();
        match self.store.save(&statuses) {
            Ok(()) => {
                info!("Persisted statuses of {} zones", statuses.len());
                true
            }
            Err(e) => {
                error!("Failed to persist statuses: {}", e);
                false
            }
        }
    }

    /// One sweep, followed by a persist if anything watered.
    pub fn run_once(&mut self) -> bool {
        let supplied = self.sweep();
        if supplied {
            self.persist();
        }
        supplied
    }

    /// Sweep forever at the configured cadence.
    pub fn run(&mut self) -> ! {
        info!(
            "Runner: {} zones, check interval {:?}, rolling window {:?}",
            self.zones.len(),
            self.settings.check_interval,
            self.settings.rolling_window
        );
        loop {
            self.run_once();
            std::thread::sleep(self.settings.check_interval);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn zone(&self, name: &str) -> Option<&Zone<V>> {
        self.zones.get(name)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone<V>> {
        self.zones.values()
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    /// Sweeps executed since startup.
    pub fn sweep_count(&self) -> u64 {
        self.sweeps
    }

    /// Log each zone's rolling total and next due time.
    pub fn log_summary(&self) {
        let now = self.clock.now();
        for zone in self.zones.values() {
            let used = zone.rolling_total_at(now);
            let cap = zone.config().max_supply_per_day;
            match zone.next_interval_due() {
                Some(due) if due <= now => info!(
                    "Zone {}: {:?} of {:?} used, interval supply due now",
                    zone.name(),
                    used,
                    cap
                ),
                Some(due) => info!(
                    "Zone {}: {:?} of {:?} used, next interval supply at {}",
                    zone.name(),
                    used,
                    cap,
                    due.to_rfc3339()
                ),
                None => info!(
                    "Zone {}: {:?} of {:?} used, interval supply disabled",
                    zone.name(),
                    used,
                    cap
                ),
            }
        }
    }
}

/// Build zones with the runner's rolling window applied.
pub fn build_zones<V, F>(
    configs: Vec<ZoneConfig>,
    settings: &RunnerSettings,
    mut make_valve: F,
) -> anyhow::Result<Vec<Zone<V>>>
where
    V: ValvePort,
    F: FnMut(&ZoneConfig) -> anyhow::Result<V>,
{
    configs
        .into_iter()
        .map(|config| {
            let valve = make_valve(&config)?;
            Ok(Zone::new(config, valve).with_rolling_window(settings.rolling_window))
        })
        .collect()
}
