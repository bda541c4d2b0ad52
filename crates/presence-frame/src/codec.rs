use bytes::{BufMut, BytesMut};
use serde::Serialize;
use serde_json::Value;

use crate::error::{FrameError, Result};
use crate::opcode::Opcode;

/// Frame header: opcode (4) + length (4) = 8 bytes.
pub const HEADER_SIZE: usize = 8;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// A decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// What kind of frame this is.
    pub opcode: Opcode,
    /// The parsed JSON payload.
    pub payload: Value,
}

impl Frame {
    /// Create a new frame.
    pub fn new(opcode: Opcode, payload: Value) -> Self {
        Self { opcode, payload }
    }

    /// Look up a top-level string field of the payload.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────┬───────────────────────────┐
/// │ Opcode       │ Length       │ Payload                   │
/// │ (4B LE)      │ (4B LE)      │ (Length bytes, UTF-8 JSON) │
/// └──────────────┴──────────────┴───────────────────────────┘
/// ```
///
/// The payload is compact JSON; `Length` is its exact byte count.
pub fn encode_frame<T: Serialize + ?Sized>(
    opcode: Opcode,
    value: &T,
    dst: &mut BytesMut,
) -> Result<()> {
    let payload = serde_json::to_vec(value).map_err(FrameError::Encode)?;
    let header = encode_header(opcode, payload.len())?;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&header);
    dst.put_slice(&payload);
    Ok(())
}

/// Encode just the 8-byte header for a payload of `len` bytes.
pub fn encode_header(opcode: Opcode, len: usize) -> Result<[u8; HEADER_SIZE]> {
    let len = u32::try_from(len).map_err(|_| FrameError::PayloadTooLarge {
        size: len,
        max: u32::MAX as usize,
    })?;
    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&opcode.as_u32().to_le_bytes());
    header[4..8].copy_from_slice(&len.to_le_bytes());
    Ok(header)
}

/// Unpack an 8-byte header into its opcode and declared payload length.
pub fn decode_header(header: &[u8; HEADER_SIZE]) -> Result<(Opcode, usize)> {
    let raw_opcode = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let opcode = Opcode::try_from(raw_opcode)?;
    Ok((opcode, len as usize))
}

/// Parse payload bytes as UTF-8 JSON.
pub fn decode_payload(payload: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(payload)?;
    serde_json::from_str(text).map_err(FrameError::InvalidJson)
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes, both directions. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
