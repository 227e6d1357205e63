//! Container Registry
//!
//! Maps logical keys to container instances. Write commands resolve
//! their key to a container of the matching kind, creating one on first
//! write; a key already bound to the other kind fails with `WrongType`.
//! Read commands never create anything: a missing key is reported as
//! absent so the caller can produce the empty-equivalent reply.

use std::collections::HashMap;

use bytes::Bytes;

use crate::container::ScoreMap;
use crate::error::{Result, ScoreKvError};
use crate::timeseries::TimeSeries;

/// A container bound to a logical key.
#[derive(Debug)]
pub enum DataValue {
    /// Map container: arbitrary double scores.
    Map(ScoreMap),
    /// Time-series container: timestamp scores.
    Series(TimeSeries),
}

/// Registry of logical keys and their containers. Keys are binary-safe.
#[derive(Debug, Default)]
pub struct Store {
    entries: HashMap<Bytes, DataValue>,
}

impl Store {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a key is bound to any container.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    // =========================================================================
    // Map containers
    // =========================================================================

    /// Resolve a key for reading as a map. `Ok(None)` means the key is
    /// unbound; a key bound to a series fails with `WrongType`.
    pub fn map(&self, key: &[u8]) -> Result<Option<&ScoreMap>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(DataValue::Map(map)) => Ok(Some(map)),
            Some(DataValue::Series(_)) => Err(ScoreKvError::WrongType),
        }
    }

    /// Resolve a key for writing as a map, creating an empty container
    /// on first write.
    pub fn map_mut(&mut self, key: &Bytes) -> Result<&mut ScoreMap> {
        let slot = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| DataValue::Map(ScoreMap::new()));
        match slot {
            DataValue::Map(map) => Ok(map),
            DataValue::Series(_) => Err(ScoreKvError::WrongType),
        }
    }

    // =========================================================================
    // Time-series containers
    // =========================================================================

    /// Resolve a key for reading as a series. `Ok(None)` means the key
    /// is unbound; a key bound to a map fails with `WrongType`.
    pub fn series(&self, key: &[u8]) -> Result<Option<&TimeSeries>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(DataValue::Series(series)) => Ok(Some(series)),
            Some(DataValue::Map(_)) => Err(ScoreKvError::WrongType),
        }
    }

    /// Resolve a key for writing as a series, creating an empty
    /// container on first write.
    pub fn series_mut(&mut self, key: &Bytes) -> Result<&mut TimeSeries> {
        let slot = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| DataValue::Series(TimeSeries::new()));
        match slot {
            DataValue::Series(series) => Ok(series),
            DataValue::Map(_) => Err(ScoreKvError::WrongType),
        }
    }
}
