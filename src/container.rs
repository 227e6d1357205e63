//! Ordered Map Container
//!
//! The coordination point between the two structures every container is
//! built from:
//! - a hash index giving O(1) score → value lookup
//! - a skip list giving O(log n) rank and score-range traversal
//!
//! Both structures always agree on membership and value: every mutation
//! goes through [`ScoreMap::set`], which updates them together and never
//! returns with only one side changed.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use bytes::Bytes;
use ordered_float::OrderedFloat;

use crate::error::{Result, ScoreKvError};
use crate::skiplist::SkipList;

/// Outcome of a [`ScoreMap::set`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The score was new; an entry was added.
    Inserted,
    /// The score existed; its value was replaced in place.
    Updated,
}

/// Which of score / value each range result entry carries.
///
/// The zero projection resolves to values-only, so at least one side is
/// always emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Projection {
    pub include_scores: bool,
    pub include_values: bool,
}

impl Projection {
    /// Values only (the default output shape).
    pub fn values() -> Self {
        Self {
            include_scores: false,
            include_values: true,
        }
    }

    /// Score and value per entry (`withscores`).
    pub fn with_scores() -> Self {
        Self {
            include_scores: true,
            include_values: true,
        }
    }

    /// Score only per entry (`novalues`).
    pub fn scores_only() -> Self {
        Self {
            include_scores: true,
            include_values: false,
        }
    }

    /// Apply the default: neither flag set means values only.
    pub fn resolve(self) -> Self {
        if !self.include_scores && !self.include_values {
            Self::values()
        } else {
            self
        }
    }

    /// Number of fields emitted per entry.
    pub fn width(self) -> usize {
        usize::from(self.include_scores) + usize::from(self.include_values)
    }

    fn emit(self, out: &mut Vec<RangeItem>, score: f64, value: &Bytes) {
        if self.include_scores {
            out.push(RangeItem::Score(score));
        }
        if self.include_values {
            out.push(RangeItem::Value(value.clone()));
        }
    }
}

/// One field of a range result: entries are emitted as a flat sequence
/// of score and/or value fields, in entry order.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeItem {
    Score(f64),
    Value(Bytes),
}

/// A score interval with independently inclusive/exclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub min_exclusive: bool,
    pub max_exclusive: bool,
}

impl ScoreRange {
    /// Interval inclusive on both ends.
    pub fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.min.is_nan() || self.max.is_nan() {
            return Err(ScoreKvError::InvalidScore);
        }
        Ok(())
    }

    fn admits_max(&self, score: f64) -> bool {
        if self.max_exclusive {
            score < self.max
        } else {
            score <= self.max
        }
    }
}

/// Score-indexed ordered associative container.
///
/// Holds (score, value) entries unique by score. Scores are doubles
/// (±infinity allowed, NaN rejected); values are opaque byte payloads.
/// Lookup by exact score is O(1), everything positional is O(log n)
/// plus O(1) per emitted entry.
#[derive(Debug, Default)]
pub struct ScoreMap {
    /// Exact index: score → value, IEEE-754 equality.
    index: HashMap<OrderedFloat<f64>, Bytes>,
    /// Ordered sequence of the same entries.
    order: SkipList,
}

impl ScoreMap {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            order: SkipList::new(),
        }
    }

    /// Number of entries; identical for both internal structures.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the container holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert a new entry or replace the value at an existing score.
    ///
    /// Both structures are updated before this returns; on update the
    /// value is swapped in place with no re-sort, since the sort key
    /// did not change. A NaN score is rejected with nothing mutated.
    pub fn set(&mut self, score: f64, value: Bytes) -> Result<SetOutcome> {
        if score.is_nan() {
            return Err(ScoreKvError::InvalidScore);
        }
        match self.index.entry(OrderedFloat(score)) {
            Entry::Occupied(mut slot) => {
                // There is exactly one node with this score, and the
                // threshold lookup lands on it.
                if let Some(node) = self.order.first_at_least(score) {
                    self.order.set_value(node, value.clone());
                }
                slot.insert(value);
                Ok(SetOutcome::Updated)
            }
            Entry::Vacant(slot) => {
                self.order.insert(score, value.clone());
                slot.insert(value);
                Ok(SetOutcome::Inserted)
            }
        }
    }

    /// Value at an exact score, O(1).
    pub fn get(&self, score: f64) -> Option<Bytes> {
        self.index.get(&OrderedFloat(score)).cloned()
    }

    /// Whether an entry with this exact score exists, O(1).
    pub fn exists(&self, score: f64) -> bool {
        self.index.contains_key(&OrderedFloat(score))
    }

    /// Value of the lowest-scored entry, O(1).
    pub fn head(&self) -> Result<Bytes> {
        self.order
            .front()
            .map(|id| self.order.value(id).clone())
            .ok_or(ScoreKvError::EmptyContainer)
    }

    /// Value of the highest-scored entry, O(1).
    pub fn tail(&self) -> Result<Bytes> {
        self.order
            .back()
            .map(|id| self.order.value(id).clone())
            .ok_or(ScoreKvError::EmptyContainer)
    }

    /// 1-based rank the given score holds, or would hold if inserted.
    pub fn rank_of_score(&self, score: f64) -> Result<usize> {
        if score.is_nan() {
            return Err(ScoreKvError::InvalidScore);
        }
        Ok(self.order.rank_at_least(score))
    }

    /// Entries between two signed ranks, inclusive.
    ///
    /// Negative ranks count from the end (-1 = last). `start` clamps to
    /// 0, `end` to the last entry; an inverted or out-of-range window
    /// yields no entries. With `reverse` the window is counted from the
    /// high end and emitted high-to-low.
    pub fn range_by_rank(
        &self,
        start: i64,
        end: i64,
        reverse: bool,
        projection: Projection,
    ) -> Vec<RangeItem> {
        let projection = projection.resolve();
        let len = self.order.len() as i64;

        let mut start = if start < 0 { len + start } else { start };
        let mut end = if end < 0 { len + end } else { end };
        if start < 0 {
            start = 0;
        }
        // start >= 0 here, so start > end also covers end < 0.
        if start > end || start >= len {
            return Vec::new();
        }
        if end >= len {
            end = len - 1;
        }
        let count = (end - start + 1) as usize;

        // Trivial endpoints skip the log(n) rank descent.
        let mut node = if reverse {
            if start == 0 {
                self.order.back()
            } else {
                self.order.get_by_rank((len - start) as usize)
            }
        } else if start == 0 {
            self.order.front()
        } else {
            self.order.get_by_rank(start as usize + 1)
        };

        let mut out = Vec::with_capacity(count * projection.width());
        for _ in 0..count {
            let Some(id) = node else { break };
            projection.emit(&mut out, self.order.score(id), self.order.value(id));
            node = if reverse {
                self.order.prev(id)
            } else {
                self.order.next(id)
            };
        }
        out
    }

    /// Entries whose score falls inside the given interval, ascending.
    pub fn range_by_score(&self, range: ScoreRange, projection: Projection) -> Result<Vec<RangeItem>> {
        range.validate()?;
        let projection = projection.resolve();

        let mut out = Vec::new();
        let mut node = self.first_in_range(range);
        while let Some(id) = node {
            let score = self.order.score(id);
            if !range.admits_max(score) {
                break;
            }
            projection.emit(&mut out, score, self.order.value(id));
            node = self.order.next(id);
        }
        Ok(out)
    }

    /// Number of entries whose score falls inside the given interval.
    pub fn count_by_score(&self, range: ScoreRange) -> Result<usize> {
        range.validate()?;

        let mut count = 0;
        let mut node = self.first_in_range(range);
        while let Some(id) = node {
            if !range.admits_max(self.order.score(id)) {
                break;
            }
            count += 1;
            node = self.order.next(id);
        }
        Ok(count)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// First entry satisfying the min bound. Scores are unique, so an
    /// exclusive min skips at most one entry.
    fn first_in_range(&self, range: ScoreRange) -> Option<crate::skiplist::NodeId> {
        let mut node = self.order.first_at_least(range.min);
        if range.min_exclusive {
            if let Some(id) = node {
                if self.order.score(id) == range.min {
                    node = self.order.next(id);
                }
            }
        }
        node
    }
}
