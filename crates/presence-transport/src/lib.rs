//! Local channel discovery and transport for rich-presence IPC.
//!
//! The peer desktop application listens on one of ten numbered endpoints:
//! - Unix domain sockets under the user's runtime directory (Linux/macOS)
//! - Named pipes under `\\?\pipe\` (Windows)
//!
//! This is the lowest layer of presence. Everything else builds on top of
//! the [`IpcStream`] type and the [`LocalChannel`] trait provided here.

pub mod discovery;
pub mod error;
pub mod traits;

#[cfg(windows)]
pub mod pipe;
#[cfg(unix)]
pub mod uds;

pub use discovery::{
    discover, discover_with, open_endpoint, Candidate, DiscoveryConfig, DEFAULT_SLOT_COUNT,
};
pub use error::{Result, TransportError};
pub use traits::{IpcStream, LocalChannel};

#[cfg(windows)]
pub use pipe::NamedPipe;
#[cfg(unix)]
pub use uds::UnixDomainSocket;
