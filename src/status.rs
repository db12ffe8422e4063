//! Persisted zone status.
//!
//! [`compact`] projects a live [`ZoneState`] into a [`PersistedSnapshot`];
//! [`unpack`] rebuilds the state on startup. The on-disk encoding stays
//! readable by (and can read files from) earlier releases of the
//! controller:
//!
//! ```json
//! {
//!   "front-lawn": {
//!     "last_supply": "2024-05-01T10:00:00.123456789Z",
//!     "last_intervaled_supply": "0001-01-01T00:00:00Z",
//!     "SupplyEvents": [
//!       { "Time": "2024-05-01T10:00:00.123456789Z", "Duration": 30000000000 }
//!     ]
//!   }
//! }
//! ```
//!
//! - Timestamps are RFC 3339 with nanosecond precision. Any UTC offset is
//!   accepted on read and normalised to UTC.
//! - "Never" is written as the zero time `0001-01-01T00:00:00Z`.
//! - Durations are integer nanoseconds.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{SupplyEvent, SupplyLedger};
use crate::zone::ZoneState;

/// Zone name → persisted snapshot.
pub type StatusMap = BTreeMap<String, PersistedSnapshot>;

/// Durable projection of a [`ZoneState`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    #[serde(default, with = "zero_time")]
    pub last_supply: Option<DateTime<Utc>>,
    #[serde(default, with = "zero_time")]
    pub last_intervaled_supply: Option<DateTime<Utc>>,
    #[serde(
        rename = "SupplyEvents",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub events: Vec<PersistedEvent>,
}

/// One [`SupplyEvent`] as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEvent {
    #[serde(rename = "Time", with = "rfc3339")]
    pub time: DateTime<Utc>,
    #[serde(rename = "Duration", with = "nanos")]
    pub duration: Duration,
}

impl From<SupplyEvent> for PersistedEvent {
    fn from(e: SupplyEvent) -> Self {
        Self {
            time: e.timestamp,
            duration: e.duration,
        }
    }
}

impl From<PersistedEvent> for SupplyEvent {
    fn from(e: PersistedEvent) -> Self {
        SupplyEvent::new(e.time, e.duration)
    }
}

/// Project live state into its persistable form. Pure.
pub fn compact(state: &ZoneState) -> PersistedSnapshot {
    PersistedSnapshot {
        last_supply: state.last_supply,
        last_intervaled_supply: state.last_intervaled_supply,
        events: state
            .ledger
            .snapshot()
            .into_iter()
            .map(PersistedEvent::from)
            .collect(),
    }
}

/// Rebuild live state from a snapshot.
///
/// Events are put back into time order first (stable, so equal timestamps
/// keep their file order). Window eviction only ever looks at the front of
/// the ledger, so a hand-edited or reordered file must not leave a stale
/// event behind a newer one.
pub fn unpack(snapshot: PersistedSnapshot) -> ZoneState {
    let mut events = snapshot.events;
    events.sort_by_key(|e| e.time);
    let mut ledger = SupplyLedger::new();
    ledger.restore(events.into_iter().map(SupplyEvent::from));
    ZoneState {
        last_supply: snapshot.last_supply,
        last_intervaled_supply: snapshot.last_intervaled_supply,
        ledger,
    }
}

/// Decode a status file body.
pub fn decode(json: &[u8]) -> serde_json::Result<StatusMap> {
    serde_json::from_slice(json)
}

/// Encode a status map into a status file body.
pub fn encode(statuses: &StatusMap) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(statuses)
}

// ── Field codecs ──────────────────────────────────────────────

fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

mod rfc3339 {
    use chrono::{DateTime, Datelike, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(de)?;
        let t = DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)?;
        // RFC 3339 only has four-digit years; an offset must not push the
        // UTC instant outside what we can write back.
        if !(0..=9999).contains(&t.year()) {
            return Err(serde::de::Error::custom(format!(
                "timestamp {s} is outside years 0000-9999 in UTC"
            )));
        }
        Ok(t)
    }
}

mod zero_time {
    use chrono::{DateTime, Datelike, Utc};
    use serde::{Deserializer, Serializer};

    const ZERO: &str = "0001-01-01T00:00:00Z";

    pub fn serialize<S: Serializer>(t: &Option<DateTime<Utc>>, ser: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => super::rfc3339::serialize(t, ser),
            None => ser.serialize_str(ZERO),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let t = super::rfc3339::deserialize(de)?;
        Ok((t.year() > 1).then_some(t))
    }
}

mod nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        u64::deserialize(de).map(Duration::from_nanos)
    }
}
