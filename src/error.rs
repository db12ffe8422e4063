//! Unified error types for the irrigation controller.
//!
//! Nothing in the decision core can fail: a declined supply is a policy
//! outcome, not an error. The variants here cover the two load/store
//! boundaries only. A bad zone config is fatal at startup; a bad status
//! file is logged and the zones start with empty history.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Zone configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The zone config file could not be read.
    #[error("failed to read zone configs from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON, or a record failed range validation.
    #[error("failed to parse zone configs from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The file parsed but contains no zones.
    #[error("zone config file {0} defines no zones")]
    NoZones(PathBuf),
    /// Two records share a name.
    #[error("zone '{0}' is defined more than once")]
    DuplicateZone(String),
    /// A single record failed validation.
    #[error("zone '{zone}': {reason}")]
    Invalid { zone: String, reason: &'static str },
}

// ---------------------------------------------------------------------------
// Persisted status
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("failed to read status file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse status file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode statuses: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write status file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StatusError {
    /// True when the file simply does not exist yet (first run).
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
