//! Zone and runner configuration.
//!
//! Zone records are loaded once at startup from a JSON array and are
//! immutable afterwards. The JSON field names match the files written for
//! earlier releases of the controller, so existing installations keep their
//! `rpi_zone_configs.json` unchanged:
//!
//! ```json
//! [
//!   {
//!     "name": "front-lawn",
//!     "interval_second": 86400,
//!     "interval_supply_second": 120,
//!     "max_supply_second_per_day": 300,
//!     "pump_relay_pin_number": 17
//!   }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default trailing span over which supplied time is capped.
pub const DEFAULT_ROLLING_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Highest BCM GPIO number routed to the 40-pin header.
pub const MAX_RELAY_PIN: u8 = 27;

// ═══════════════════════════════════════════════════════════════
//  Zone config
// ═══════════════════════════════════════════════════════════════

/// Validated per-zone policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ZoneConfigRecord", into = "ZoneConfigRecord")]
pub struct ZoneConfig {
    /// Unique zone name, also the key in the status file.
    pub name: String,
    /// Interval between automatic supplies. `None` disables them.
    pub interval: Option<Duration>,
    /// How long each interval-triggered supply holds the valve open.
    pub intervaled_supply: Duration,
    /// Cap on total supplied time within the rolling window.
    pub max_supply_per_day: Duration,
    /// BCM GPIO number of the zone's relay.
    pub relay_pin: u8,
}

/// On-disk shape of a zone record. Seconds are signed so that a
/// non-positive interval can be written to disable interval triggering.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ZoneConfigRecord {
    name: String,
    interval_second: i64,
    interval_supply_second: i64,
    max_supply_second_per_day: i64,
    pump_relay_pin_number: i64,
}

impl TryFrom<ZoneConfigRecord> for ZoneConfig {
    type Error = ConfigError;

    fn try_from(r: ZoneConfigRecord) -> Result<Self, Self::Error> {
        let invalid = |reason| ConfigError::Invalid {
            zone: r.name.clone(),
            reason,
        };

        if r.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if r.interval_supply_second < 0 {
            return Err(invalid("interval_supply_second must be >= 0"));
        }
        if r.max_supply_second_per_day < 0 {
            return Err(invalid("max_supply_second_per_day must be >= 0"));
        }
        let relay_pin = u8::try_from(r.pump_relay_pin_number)
            .ok()
            .filter(|p| *p <= MAX_RELAY_PIN)
            .ok_or_else(|| invalid("pump_relay_pin_number must be 0–27"))?;

        let interval = (r.interval_second > 0).then(|| secs(r.interval_second));
        if interval.is_some() {
            if r.interval_supply_second == 0 {
                return Err(invalid(
                    "interval_supply_second must be > 0 when interval_second > 0",
                ));
            }
            if r.interval_supply_second > r.max_supply_second_per_day {
                return Err(invalid(
                    "interval_supply_second must not exceed max_supply_second_per_day",
                ));
            }
        }

        Ok(Self {
            interval,
            intervaled_supply: secs(r.interval_supply_second),
            max_supply_per_day: secs(r.max_supply_second_per_day),
            relay_pin,
            name: r.name,
        })
    }
}

impl From<ZoneConfig> for ZoneConfigRecord {
    fn from(c: ZoneConfig) -> Self {
        Self {
            name: c.name,
            interval_second: c.interval.map_or(0, |d| d.as_secs() as i64),
            interval_supply_second: c.intervaled_supply.as_secs() as i64,
            max_supply_second_per_day: c.max_supply_per_day.as_secs() as i64,
            pump_relay_pin_number: i64::from(c.relay_pin),
        }
    }
}

fn secs(s: i64) -> Duration {
    Duration::from_secs(s.unsigned_abs())
}

/// Parse and validate a JSON array of zone records.
pub fn parse_zone_configs(json: &str, origin: &Path) -> Result<Vec<ZoneConfig>, ConfigError> {
    let configs: Vec<ZoneConfig> =
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

    if configs.is_empty() {
        return Err(ConfigError::NoZones(origin.to_path_buf()));
    }

    let mut seen = HashSet::new();
    for c in &configs {
        if !seen.insert(c.name.as_str()) {
            return Err(ConfigError::DuplicateZone(c.name.clone()));
        }
    }

    Ok(configs)
}

/// Load zone configs from a JSON file. Any failure here is fatal:
/// the controller must not start without zones.
pub fn load_zone_configs(path: &Path) -> Result<Vec<ZoneConfig>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let configs = parse_zone_configs(&json, path)?;
    info!(
        "Loaded {} zone configs from {}",
        configs.len(),
        path.display()
    );
    for c in &configs {
        info!(
            "  zone '{}': interval={:?} supply={:?} cap={:?} pin={}",
            c.name, c.interval, c.intervaled_supply, c.max_supply_per_day, c.relay_pin
        );
    }
    Ok(configs)
}

// ═══════════════════════════════════════════════════════════════
//  Runner settings
// ═══════════════════════════════════════════════════════════════

/// Timing parameters for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Sleep between sweeps.
    pub check_interval: Duration,
    /// Settle delay before checking each zone.
    pub zone_gap: Duration,
    /// Trailing span for the daily cap.
    pub rolling_window: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(5 * 60),
            zone_gap: Duration::from_secs(1),
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}
