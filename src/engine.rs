//! Engine Module
//!
//! Executes parsed commands against the container registry.
//!
//! ## Responsibilities
//! - Route commands to the right container kind
//! - Serialize writers against readers (one writer at a time)
//! - Map container results and errors to protocol replies
//!
//! ## Concurrency Model
//!
//! Container operations themselves are single-threaded and lock-free;
//! the engine provides the external mutual exclusion they assume.
//! Reads (`TLEN`, `TGET`, ranges, counts) share a read lock; writes
//! (`TADD`, `TSADD`) take the write lock, so no two operations ever
//! interleave on the same container.
//!
//! ## Reply Conventions
//!
//! Reads on an unbound key answer with the empty-equivalent value
//! (0 for lengths/counts/flags/ranks, nil for point lookups, an empty
//! array for ranges and head/tail) without creating a container.

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::Result;
use crate::protocol::{Command, Reply};
use crate::store::Store;

/// The command execution engine.
pub struct Engine {
    /// Container registry; the lock serializes writers.
    store: RwLock<Store>,
}

impl Engine {
    /// Create an engine with an empty registry.
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::new()),
        }
    }

    /// Execute a command, turning any error into an error reply.
    pub fn execute(&self, command: Command) -> Reply {
        match self.dispatch(command) {
            Ok(reply) => reply,
            Err(e) => Reply::error(e.to_string()),
        }
    }

    fn dispatch(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Ping => Ok(Reply::bulk(Bytes::from_static(b"PONG"))),

            // -----------------------------------------------------------------
            // Map commands
            // -----------------------------------------------------------------
            Command::TLen { key } => {
                let store = self.store.read();
                Ok(Reply::Integer(
                    store.map(&key)?.map_or(0, |m| m.len() as i64),
                ))
            }

            Command::TAdd { key, pairs } => {
                let mut store = self.store.write();
                let map = store.map_mut(&key)?;
                for (score, value) in pairs {
                    map.set(score, value)?;
                }
                tracing::debug!(key = %String::from_utf8_lossy(&key), len = map.len(), "tadd applied");
                Ok(Reply::Ok)
            }

            Command::TExists { key, score } => {
                let store = self.store.read();
                let exists = store.map(&key)?.is_some_and(|m| m.exists(score));
                Ok(Reply::Integer(i64::from(exists)))
            }

            Command::TGet { key, score } => {
                let store = self.store.read();
                match store.map(&key)?.and_then(|m| m.get(score)) {
                    Some(value) => Ok(Reply::Bulk(value)),
                    None => Ok(Reply::Nil),
                }
            }

            Command::THead { key } => {
                let store = self.store.read();
                match store.map(&key)? {
                    Some(map) => Ok(Reply::Bulk(map.head()?)),
                    None => Ok(Reply::Array(Vec::new())),
                }
            }

            Command::TTail { key } => {
                let store = self.store.read();
                match store.map(&key)? {
                    Some(map) => Ok(Reply::Bulk(map.tail()?)),
                    None => Ok(Reply::Array(Vec::new())),
                }
            }

            Command::TRange {
                key,
                start,
                end,
                projection,
            } => {
                let store = self.store.read();
                match store.map(&key)? {
                    Some(map) => Ok(Reply::from_range(
                        map.range_by_rank(start, end, false, projection),
                    )),
                    None => Ok(Reply::Array(Vec::new())),
                }
            }

            Command::TRangeByScore {
                key,
                range,
                projection,
            } => {
                let store = self.store.read();
                match store.map(&key)? {
                    Some(map) => Ok(Reply::from_range(map.range_by_score(range, projection)?)),
                    None => Ok(Reply::Array(Vec::new())),
                }
            }

            Command::TCount { key, range } => {
                let store = self.store.read();
                match store.map(&key)? {
                    Some(map) => Ok(Reply::Integer(map.count_by_score(range)? as i64)),
                    None => Ok(Reply::Integer(0)),
                }
            }

            // -----------------------------------------------------------------
            // Time-series commands
            // -----------------------------------------------------------------
            Command::TsLen { key } => {
                let store = self.store.read();
                Ok(Reply::Integer(
                    store.series(&key)?.map_or(0, |s| s.len() as i64),
                ))
            }

            Command::TsAdd { key, pairs } => {
                let mut store = self.store.write();
                let series = store.series_mut(&key)?;
                for (time, value) in pairs {
                    series.add(time, value)?;
                }
                tracing::debug!(key = %String::from_utf8_lossy(&key), len = series.len(), "tsadd applied");
                Ok(Reply::Ok)
            }

            Command::TsExists { key, time } => {
                let store = self.store.read();
                let exists = store.series(&key)?.is_some_and(|s| s.exists(time));
                Ok(Reply::Integer(i64::from(exists)))
            }

            Command::TsRank { key, time } => {
                let store = self.store.read();
                match store.series(&key)? {
                    Some(series) => Ok(Reply::Integer(series.rank_of_time(time)? as i64)),
                    None => Ok(Reply::Integer(0)),
                }
            }

            Command::TsGet { key, time } => {
                let store = self.store.read();
                match store.series(&key)?.and_then(|s| s.get(time)) {
                    Some(value) => Ok(Reply::Bulk(value)),
                    None => Ok(Reply::Nil),
                }
            }

            Command::TsRange {
                key,
                start,
                end,
                projection,
            } => {
                let store = self.store.read();
                match store.series(&key)? {
                    Some(series) => Ok(Reply::from_range(
                        series.range_by_rank(start, end, false, projection),
                    )),
                    None => Ok(Reply::Array(Vec::new())),
                }
            }

            Command::TsRangeByTime {
                key,
                range,
                projection,
            } => {
                let store = self.store.read();
                match store.series(&key)? {
                    Some(series) => Ok(Reply::from_range(series.range_by_time(range, projection)?)),
                    None => Ok(Reply::Array(Vec::new())),
                }
            }

            Command::TsCount { key, range } => {
                let store = self.store.read();
                match store.series(&key)? {
                    Some(series) => Ok(Reply::Integer(series.count_by_time(range)? as i64)),
                    None => Ok(Reply::Integer(0)),
                }
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
