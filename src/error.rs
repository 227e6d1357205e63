//! Error types for ScoreKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ScoreKvError
pub type Result<T> = std::result::Result<T, ScoreKvError>;

/// Unified error type for ScoreKV operations
#[derive(Debug, Error)]
pub enum ScoreKvError {
    // -------------------------------------------------------------------------
    // Container Errors
    // -------------------------------------------------------------------------
    #[error("score is not a valid double")]
    InvalidScore,

    #[error("container is empty")]
    EmptyContainer,

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    // -------------------------------------------------------------------------
    // Argument Parsing Errors
    // -------------------------------------------------------------------------
    #[error("value is not a double")]
    NotADouble,

    #[error("value is not an integer or out of range")]
    NotAnInteger,

    #[error("syntax error")]
    Syntax,

    #[error("wrong number of arguments for '{0}'")]
    WrongArity(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    // -------------------------------------------------------------------------
    // I/O and Protocol Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}
