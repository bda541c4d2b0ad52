//! Rich-presence client over local IPC.
//!
//! presence discovers a running desktop client over its local socket or named
//! pipe, completes the handshake, and pushes activity updates to it.
//!
//! # Crate Structure
//!
//! - [`transport`]: Endpoint discovery and the local channel (UDS, named pipes)
//! - [`frame`]: Opcode + length prefixed JSON framing
//! - [`session`]: Handshake, activity publishing and teardown

/// Re-export transport types.
pub mod transport {
    pub use presence_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use presence_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use presence_session::*;
}

pub use presence_session::{PublishOutcome, Session, SessionConfig, SessionError};
