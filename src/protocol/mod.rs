//! Protocol Module
//!
//! Defines the command surface and the wire protocol for client-server
//! communication.
//!
//! ## Request Format
//! A request is a vector of binary tokens, the first being the command
//! name:
//! ```text
//! ┌───────────┬──────────┬─────────┬──────────┬─────────┬───┐
//! │ Count (4) │ Len (4)  │ Token   │ Len (4)  │ Token   │ … │
//! └───────────┴──────────┴─────────┴──────────┴─────────┴───┘
//! ```
//!
//! ## Reply Format
//! A reply is a tagged value:
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Tag (1)  │       Tag-specific body     │
//! └──────────┴─────────────────────────────┘
//! ```
//! - 0x00: OK       - empty body
//! - 0x01: INTEGER  - 8-byte big-endian signed integer
//! - 0x02: BULK     - len (4) + bytes
//! - 0x03: NIL      - empty body
//! - 0x04: ARRAY    - count (4) + nested replies
//! - 0x05: ERROR    - len (4) + UTF-8 message

mod command;
mod reply;
mod codec;

pub use codec::{
    decode_reply, decode_request, encode_reply, encode_request, read_reply, read_request,
    write_reply, write_request, MAX_TOKENS, MAX_TOKEN_SIZE,
};
pub use command::Command;
pub use reply::{format_score, Reply};
