//! JSON status file adapter.
//!
//! Implements [`StatusStore`] on top of a single JSON file.
//!
//! Writes go to `<file>.tmp` first and are then renamed over the target.
//! `rename` is atomic on the same filesystem, so a power cut mid-write
//! leaves either the previous sweep's file or the new one, never a
//! truncated mix.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use log::info;

use crate::app::ports::StatusStore;
use crate::error::StatusError;
use crate::status::{self, StatusMap};

pub struct JsonStatusFile {
    path: PathBuf,
}

impl JsonStatusFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl StatusStore for JsonStatusFile {
    fn load(&self) -> Result<StatusMap, StatusError> {
        let bytes = fs::read(&self.path).map_err(|source| StatusError::Read {
            path: self.path.clone(),
            source,
        })?;
        status::decode(&bytes).map_err(|source| StatusError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&mut self, statuses: &StatusMap) -> Result<(), StatusError> {
        let bytes = status::encode(statuses).map_err(StatusError::Encode)?;
        let tmp = self.temp_path();
        let write_err = |source| StatusError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = fs::File::create(&tmp).map_err(write_err)?;
        file.write_all(&bytes).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        info!(
            "StatusFile: persisted {} zones to {} ({} bytes)",
            statuses.len(),
            self.path.display(),
            bytes.len()
        );
        Ok(())
    }
}
