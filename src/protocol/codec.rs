//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! ┌───────────┬──────────┬─────────┬──────────┬─────────┬───┐
//! │ Count (4) │ Len (4)  │ Token   │ Len (4)  │ Token   │ … │
//! └───────────┴──────────┴─────────┴──────────┴─────────┴───┘
//! ```
//! All integers are big-endian.
//!
//! ### Reply Format
//! One tag byte followed by a tag-specific body; arrays nest.

use std::io::{Read, Write};

use bytes::Bytes;

use crate::error::{Result, ScoreKvError};
use super::Reply;

/// Maximum tokens per request
pub const MAX_TOKENS: u32 = 1024;

/// Maximum size of a single token or bulk payload (16 MB)
pub const MAX_TOKEN_SIZE: u32 = 16 * 1024 * 1024;

/// Maximum elements in an array reply
const MAX_ARRAY_LEN: u32 = 1024 * 1024;

// Reply tags
const TAG_OK: u8 = 0x00;
const TAG_INTEGER: u8 = 0x01;
const TAG_BULK: u8 = 0x02;
const TAG_NIL: u8 = 0x03;
const TAG_ARRAY: u8 = 0x04;
const TAG_ERROR: u8 = 0x05;

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request token vector to bytes.
pub fn encode_request(tokens: &[Bytes]) -> Vec<u8> {
    let payload_len: usize = tokens.iter().map(|t| 4 + t.len()).sum();
    let mut message = Vec::with_capacity(4 + payload_len);
    message.extend_from_slice(&(tokens.len() as u32).to_be_bytes());
    for token in tokens {
        message.extend_from_slice(&(token.len() as u32).to_be_bytes());
        message.extend_from_slice(token);
    }
    message
}

/// Decode a request from a byte slice.
pub fn decode_request(bytes: &[u8]) -> Result<Vec<Bytes>> {
    let mut reader = bytes;
    read_request(&mut reader)
}

/// Read a complete request from a stream.
///
/// Blocks until a complete request is received or an error occurs.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Vec<Bytes>> {
    let count = read_u32(reader)?;
    if count == 0 {
        return Err(ScoreKvError::Protocol("empty request".to_string()));
    }
    if count > MAX_TOKENS {
        return Err(ScoreKvError::Protocol(format!(
            "too many tokens: {} (max {})",
            count, MAX_TOKENS
        )));
    }

    let mut tokens = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let len = read_u32(reader)?;
        if len > MAX_TOKEN_SIZE {
            return Err(ScoreKvError::Protocol(format!(
                "token too large: {} bytes (max {})",
                len, MAX_TOKEN_SIZE
            )));
        }
        let mut token = vec![0u8; len as usize];
        if len > 0 {
            reader.read_exact(&mut token)?;
        }
        tokens.push(Bytes::from(token));
    }
    Ok(tokens)
}

/// Write a request to a stream.
pub fn write_request<W: Write>(writer: &mut W, tokens: &[Bytes]) -> Result<()> {
    let bytes = encode_request(tokens);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply to bytes.
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    let mut message = Vec::new();
    encode_reply_into(reply, &mut message);
    message
}

fn encode_reply_into(reply: &Reply, out: &mut Vec<u8>) {
    match reply {
        Reply::Ok => out.push(TAG_OK),
        Reply::Integer(value) => {
            out.push(TAG_INTEGER);
            out.extend_from_slice(&value.to_be_bytes());
        }
        Reply::Bulk(payload) => {
            out.push(TAG_BULK);
            out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            out.extend_from_slice(payload);
        }
        Reply::Nil => out.push(TAG_NIL),
        Reply::Array(items) => {
            out.push(TAG_ARRAY);
            out.extend_from_slice(&(items.len() as u32).to_be_bytes());
            for item in items {
                encode_reply_into(item, out);
            }
        }
        Reply::Error(message) => {
            out.push(TAG_ERROR);
            let bytes = message.as_bytes();
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(bytes);
        }
    }
}

/// Decode a reply from a byte slice.
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let mut reader = bytes;
    read_reply(&mut reader)
}

/// Read a complete reply from a stream.
pub fn read_reply<R: Read>(reader: &mut R) -> Result<Reply> {
    let mut tag = [0u8; 1];
    reader.read_exact(&mut tag)?;

    match tag[0] {
        TAG_OK => Ok(Reply::Ok),
        TAG_INTEGER => {
            let mut buf = [0u8; 8];
            reader.read_exact(&mut buf)?;
            Ok(Reply::Integer(i64::from_be_bytes(buf)))
        }
        TAG_BULK => {
            let payload = read_sized(reader, MAX_TOKEN_SIZE)?;
            Ok(Reply::Bulk(Bytes::from(payload)))
        }
        TAG_NIL => Ok(Reply::Nil),
        TAG_ARRAY => {
            let count = read_u32(reader)?;
            if count > MAX_ARRAY_LEN {
                return Err(ScoreKvError::Protocol(format!(
                    "array too large: {} elements (max {})",
                    count, MAX_ARRAY_LEN
                )));
            }
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                items.push(read_reply(reader)?);
            }
            Ok(Reply::Array(items))
        }
        TAG_ERROR => {
            let payload = read_sized(reader, MAX_TOKEN_SIZE)?;
            let message = String::from_utf8(payload)
                .map_err(|_| ScoreKvError::Protocol("error message is not UTF-8".to_string()))?;
            Ok(Reply::Error(message))
        }
        other => Err(ScoreKvError::Protocol(format!(
            "unknown reply tag: 0x{:02x}",
            other
        ))),
    }
}

/// Write a reply to a stream.
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    let bytes = encode_reply(reply);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Primitive readers
// =============================================================================

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_sized<R: Read>(reader: &mut R, max: u32) -> Result<Vec<u8>> {
    let len = read_u32(reader)?;
    if len > max {
        return Err(ScoreKvError::Protocol(format!(
            "payload too large: {} bytes (max {})",
            len, max
        )));
    }
    let mut payload = vec![0u8; len as usize];
    if len > 0 {
        reader.read_exact(&mut payload)?;
    }
    Ok(payload)
}
