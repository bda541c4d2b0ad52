//! Session management for rich-presence IPC.
//!
//! This is the "just works" layer. Discover the peer, complete the
//! handshake, push activity updates, and tear the channel down again.
//!
//! ```no_run
//! use presence_session::{PublishOutcome, Session};
//! use serde_json::json;
//!
//! let mut session = Session::initialize("927639447539957761")?;
//! match session.publish(&json!({"details": "In menus"}))? {
//!     PublishOutcome::Accepted(_) => {}
//!     PublishOutcome::Rejected { message, .. } => eprintln!("peer said: {message}"),
//! }
//! session.close()?;
//! # Ok::<(), presence_session::SessionError>(())
//! ```

pub mod activity;
pub mod config;
pub mod error;
pub mod handshake;
pub mod session;
pub mod source;
pub mod state;

pub use activity::{
    ActivityArgs, ActivityRequest, CurrentProcess, ProcessIdentity, PublishOutcome,
    SET_ACTIVITY,
};
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use handshake::{is_ready, HandshakeRequest, PROTOCOL_VERSION};
pub use session::Session;
pub use source::StatusSource;
pub use state::{Phase, SessionState};
