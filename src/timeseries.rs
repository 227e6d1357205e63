//! Time-Series Façade
//!
//! The same ordered container with the score interpreted as a
//! timestamp, plus one extra query: the 1-based rank a timestamp holds
//! or would hold among the stored entries.

use bytes::Bytes;

use crate::container::{Projection, RangeItem, ScoreMap, ScoreRange, SetOutcome};
use crate::error::Result;

/// Ordered container keyed by timestamp.
#[derive(Debug, Default)]
pub struct TimeSeries {
    inner: ScoreMap,
}

impl TimeSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self {
            inner: ScoreMap::new(),
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Insert an observation, or replace the value at an existing time.
    pub fn add(&mut self, time: f64, value: Bytes) -> Result<SetOutcome> {
        self.inner.set(time, value)
    }

    /// Value at an exact time, O(1).
    pub fn get(&self, time: f64) -> Option<Bytes> {
        self.inner.get(time)
    }

    /// Whether an observation at this exact time exists, O(1).
    pub fn exists(&self, time: f64) -> bool {
        self.inner.exists(time)
    }

    /// Earliest observation's value.
    pub fn head(&self) -> Result<Bytes> {
        self.inner.head()
    }

    /// Latest observation's value.
    pub fn tail(&self) -> Result<Bytes> {
        self.inner.tail()
    }

    /// 1-based position the given time holds, or would hold if added.
    pub fn rank_of_time(&self, time: f64) -> Result<usize> {
        self.inner.rank_of_score(time)
    }

    /// Observations between two signed ranks, inclusive.
    pub fn range_by_rank(
        &self,
        start: i64,
        end: i64,
        reverse: bool,
        projection: Projection,
    ) -> Vec<RangeItem> {
        self.inner.range_by_rank(start, end, reverse, projection)
    }

    /// Observations whose time falls inside the given interval.
    pub fn range_by_time(&self, range: ScoreRange, projection: Projection) -> Result<Vec<RangeItem>> {
        self.inner.range_by_score(range, projection)
    }

    /// Number of observations whose time falls inside the interval.
    pub fn count_by_time(&self, range: ScoreRange) -> Result<usize> {
        self.inner.count_by_score(range)
    }
}
