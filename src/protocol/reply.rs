//! Reply definitions
//!
//! Represents replies to clients.

use bytes::Bytes;

use crate::container::RangeItem;

/// A reply to send to a client.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Generic success
    Ok,

    /// Signed integer (lengths, counts, ranks, existence flags)
    Integer(i64),

    /// Binary payload (values, formatted scores)
    Bulk(Bytes),

    /// Absent value
    Nil,

    /// Sequence of replies (range results)
    Array(Vec<Reply>),

    /// Error message
    Error(String),
}

impl Reply {
    /// Bulk reply from anything byte-like.
    pub fn bulk(payload: impl Into<Bytes>) -> Self {
        Reply::Bulk(payload.into())
    }

    /// Error reply from anything message-like.
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(message.into())
    }

    /// Array reply from a flat range result; scores are rendered as
    /// bulk strings so the array shape matches the projection width.
    pub fn from_range(items: Vec<RangeItem>) -> Self {
        Reply::Array(
            items
                .into_iter()
                .map(|item| match item {
                    RangeItem::Score(score) => Reply::Bulk(Bytes::from(format_score(score))),
                    RangeItem::Value(value) => Reply::Bulk(value),
                })
                .collect(),
        )
    }

    /// Whether this reply is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

/// Render a score for the wire.
///
/// Uses the shortest round-trip decimal form; infinities render as
/// `inf` / `-inf`.
pub fn format_score(score: f64) -> String {
    format!("{}", score)
}
