//! # ScoreKV
//!
//! An in-memory store of score-indexed ordered containers with:
//! - O(1) exact-score lookup through a hash index
//! - O(log n) insert, rank and score-range queries through a skip list
//! - A "map" command family keyed by arbitrary double scores
//! - A "time series" command family keyed by timestamps
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Engine                                  │
//! │        (command dispatch, one writer at a time)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Store                                   │
//! │          (logical key → Map | TimeSeries)                    │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!     ┌─────────────┐               ┌─────────────┐
//!     │  ScoreMap   │               │ TimeSeries  │
//!     │ hash index  │               │  (façade)   │
//!     │ + skip list │               └─────────────┘
//!     └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod skiplist;
pub mod container;
pub mod timeseries;
pub mod store;
pub mod engine;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use container::{Projection, RangeItem, ScoreMap, ScoreRange, SetOutcome};
pub use engine::Engine;
pub use error::{Result, ScoreKvError};
pub use store::Store;
pub use timeseries::TimeSeries;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ScoreKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
