/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The header carries an opcode outside the known set.
    #[error("unknown frame opcode {0}")]
    UnknownOpcode(u32),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The payload bytes are not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A value could not be serialized into a payload.
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before the required number of bytes arrived.
    #[error("connection closed (received {received} of {expected} bytes)")]
    ConnectionClosed { expected: usize, received: usize },
}

impl FrameError {
    /// True when the bytes on the wire were received but could not be understood.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FrameError::UnknownOpcode(_)
                | FrameError::PayloadTooLarge { .. }
                | FrameError::InvalidUtf8(_)
                | FrameError::InvalidJson(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
