//! Opcode + length prefixed JSON framing for rich-presence IPC.
//!
//! Every message is framed with an 8-byte header:
//! - A 4-byte little-endian opcode
//! - A 4-byte little-endian payload length
//!
//! followed by exactly `length` bytes of compact UTF-8 JSON. Reads accumulate
//! across short reads, so callers always get complete frames or an error.

pub mod codec;
pub mod error;
pub mod opcode;
pub mod reader;
pub mod stream;
pub mod writer;

pub use codec::{
    decode_header, decode_payload, encode_frame, encode_header, Frame, FrameConfig,
    DEFAULT_MAX_PAYLOAD, HEADER_SIZE,
};
pub use error::{FrameError, Result};
pub use opcode::Opcode;
pub use reader::read_frame;
pub use stream::FramedStream;
pub use writer::write_frame;
