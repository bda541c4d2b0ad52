//! Frame opcodes.

use std::fmt;

use crate::error::FrameError;

/// The kind of frame carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Session establishment (client → peer).
    Handshake,
    /// Command or event payload (both directions).
    Message,
    /// Orderly teardown (both directions).
    Close,
}

impl Opcode {
    /// Wire value of this opcode.
    pub fn as_u32(self) -> u32 {
        match self {
            Opcode::Handshake => 0,
            Opcode::Message => 1,
            Opcode::Close => 2,
        }
    }

    /// Returns a human-readable name for the opcode.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Handshake => "HANDSHAKE",
            Opcode::Message => "MESSAGE",
            Opcode::Close => "CLOSE",
        }
    }
}

impl TryFrom<u32> for Opcode {
    type Error = FrameError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Handshake),
            1 => Ok(Opcode::Message),
            2 => Ok(Opcode::Close),
            other => Err(FrameError::UnknownOpcode(other)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u32())
    }
}
