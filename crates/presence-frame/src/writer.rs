use std::io::Write;

use bytes::BytesMut;
use serde::Serialize;
use tracing::trace;

use crate::codec::{encode_frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};
use crate::opcode::Opcode;

/// Encode `value` and write it as one complete frame (blocking).
///
/// `scratch` is cleared and reused as the encode buffer. The header and the
/// payload go out as two writes, each flushed before this returns.
pub fn write_frame<W, T>(
    writer: &mut W,
    scratch: &mut BytesMut,
    opcode: Opcode,
    value: &T,
    config: &FrameConfig,
) -> Result<()>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    scratch.clear();
    encode_frame(opcode, value, scratch)?;

    let payload_len = scratch.len() - HEADER_SIZE;
    if payload_len > config.max_payload_size {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: config.max_payload_size,
        });
    }

    writer.write_all(&scratch[..HEADER_SIZE])?;
    writer.flush()?;
    writer.write_all(&scratch[HEADER_SIZE..])?;
    writer.flush()?;

    trace!(%opcode, len = payload_len, "wrote frame");
    Ok(())
}
