//! Cumulative punctuality history keyed by station code and date
//!
//! The history is a single JSON document whose root maps station codes to a
//! [`StationHistory`]. A run loads it once, merges one [`DateEntry`] per
//! route, and writes it back once.
//!
//! # Lifecycle
//!
//! - [`HistoryStore::load`] reads the file, or starts empty when it does not
//!   exist yet.
//! - [`HistoryStore::merge`] records a station's result for a date. The first
//!   merge for a station stores its route identity; later merges leave that
//!   identity untouched. The entry for a date is always replaced, so reruns
//!   for the same date are idempotent and the last write wins.
//! - [`HistoryStore::save`] consumes the store and writes the whole document
//!   through a temporary file in the same directory that is then renamed over
//!   the target, so a reader never sees a partially written file.
//!
//! A single process owns the store for the duration of a run; `merge` takes
//! `&mut self` and is not meant to be shared between concurrent writers.

use crate::app::models::{DateEntry, RouteDefinition, StationHistory};
use crate::constants::PRETTY_INDENT;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

/// Persisted mapping from station code to its recorded history
pub type StationHistories = BTreeMap<String, StationHistory>;

/// In-memory history loaded from, and saved back to, one JSON file
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    stations: StationHistories,
    pretty: bool,
}

impl HistoryStore {
    /// Create an empty store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stations: BTreeMap::new(),
            pretty: true,
        }
    }

    /// Load the history at `path`
    ///
    /// A missing file is not an error: the store starts empty and the file is
    /// created on the first save.
    ///
    /// # Errors
    /// * Returns `Error::Io` if the file exists but cannot be read
    /// * Returns `Error::HistoryStore` if the file is not a valid history document
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "History file {} does not exist yet, starting from an empty history",
                    path.display()
                );
                return Ok(Self::new(path));
            }
            Err(e) => {
                return Err(Error::io(
                    format!("Failed to read history file '{}'", path.display()),
                    e,
                ));
            }
        };

        let stations: StationHistories = serde_json::from_str(&content).map_err(|e| {
            Error::history_store(format!(
                "History file '{}' is not a valid history document: {}",
                path.display(),
                e
            ))
        })?;

        info!(
            "Loaded history for {} stations from {}",
            stations.len(),
            path.display()
        );

        Ok(Self {
            path,
            stations,
            pretty: true,
        })
    }

    /// Choose between indented and compact output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Record a station's result for one date
    ///
    /// Inserts the route's identity if the station is new and replaces any
    /// existing entry for the same date.
    pub fn merge(&mut self, station_code: &str, route: &RouteDefinition, entry: DateEntry) {
        let history = self
            .stations
            .entry(station_code.to_string())
            .or_insert_with(|| {
                debug!("Adding new station {} to history", station_code);
                StationHistory::new(route.meta())
            });

        if history.dates.insert(entry.date, entry).is_some() {
            debug!("Replaced existing entry for station {}", station_code);
        }
    }

    /// Write the whole history back to its file
    ///
    /// # Errors
    /// * Returns `Error::Io` if the temporary file cannot be created, written or renamed
    /// * Returns `Error::Json` if the history cannot be serialized
    pub fn save(self) -> Result<PathBuf> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !directory.exists() {
            std::fs::create_dir_all(&directory).map_err(|e| {
                Error::io(
                    format!(
                        "Failed to create history directory '{}'",
                        directory.display()
                    ),
                    e,
                )
            })?;
        }

        let mut temp_file = NamedTempFile::new_in(&directory).map_err(|e| {
            Error::io(
                format!(
                    "Failed to create temporary history file in '{}'",
                    directory.display()
                ),
                e,
            )
        })?;

        let content = self.to_json()?;
        temp_file
            .write_all(&content)
            .and_then(|_| temp_file.flush())
            .map_err(|e| Error::io("Failed to write temporary history file", e))?;

        temp_file.persist(&self.path).map_err(|e| {
            Error::io(
                format!("Failed to replace history file '{}'", self.path.display()),
                e.error,
            )
        })?;

        info!(
            "Saved history for {} stations to {}",
            self.stations.len(),
            self.path.display()
        );

        Ok(self.path)
    }

    /// Serialize the history document
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        if self.pretty {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(PRETTY_INDENT);
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            self.stations
                .serialize(&mut serializer)
                .map_err(|e| Error::json("Failed to serialize history", e))?;
        } else {
            serde_json::to_writer(&mut buffer, &self.stations)
                .map_err(|e| Error::json("Failed to serialize history", e))?;
        }
        Ok(buffer)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded stations
    pub fn stations(&self) -> &StationHistories {
        &self.stations
    }

    /// History for one station
    pub fn station(&self, station_code: &str) -> Option<&StationHistory> {
        self.stations.get(station_code)
    }

    /// Recorded entry for one station on one date
    pub fn date_entry(&self, station_code: &str, date: NaiveDate) -> Option<&DateEntry> {
        self.station(station_code)
            .and_then(|history| history.dates.get(&date))
    }

    /// Number of recorded stations
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Whether no station has been recorded
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
