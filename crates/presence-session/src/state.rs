use std::fmt;

/// Lifecycle of a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No channel attached yet.
    Disconnected,
    /// Channel open, handshake not sent.
    Connected,
    /// Handshake sent, waiting for the peer's READY dispatch.
    AwaitingReady,
    /// Handshake accepted; activity updates may be published.
    Ready,
    /// A fatal error occurred; the channel has been released.
    Failed,
    /// Closed by the owner; the channel has been released.
    Closed,
}

impl SessionState {
    /// True once the channel has been given up for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Failed | SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connected => "connected",
            SessionState::AwaitingReady => "awaiting-ready",
            SessionState::Ready => "ready",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// The session operation during which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Handshake,
    Publish,
    Close,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Connect => "connect",
            Phase::Handshake => "handshake",
            Phase::Publish => "publish",
            Phase::Close => "close",
        };
        f.write_str(name)
    }
}
