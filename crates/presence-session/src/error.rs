use presence_frame::{FrameError, Opcode};
use presence_transport::TransportError;
use serde_json::Value;

use crate::state::{Phase, SessionState};

/// Errors that can occur in session operations.
///
/// [`SessionError::InvalidActivity`], [`SessionError::RequestTooLarge`] and
/// [`SessionError::InvalidState`] leave the session as it was. Every other
/// variant ends it: the channel has already been released by the time the
/// error is returned.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No candidate endpoint could be opened.
    #[error("connect: no local channel available after {attempts} attempts (is the peer running?)")]
    ConnectionUnavailable { attempts: usize },

    /// The peer answered the handshake with something other than READY.
    #[error("handshake rejected by peer ({opcode}): {payload}")]
    HandshakeRejected { opcode: Opcode, payload: Value },

    /// The stream ended before a complete frame arrived, or the peer sent Close.
    #[error("{phase}: connection closed by peer")]
    ConnectionClosed { phase: Phase },

    /// A frame arrived that could not be decoded.
    #[error("{phase}: malformed frame: {source}")]
    MalformedFrame {
        phase: Phase,
        #[source]
        source: FrameError,
    },

    /// Any other I/O failure on the channel.
    #[error("{phase}: I/O error: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: std::io::Error,
    },

    /// The operation is not valid in the session's current state.
    #[error("{phase}: session is {state}")]
    InvalidState { phase: Phase, state: SessionState },

    /// The encoded request exceeds the frame size limit. Nothing was written.
    #[error("{phase}: request of {size} bytes exceeds the {max} byte frame limit")]
    RequestTooLarge {
        phase: Phase,
        size: usize,
        max: usize,
    },

    /// The caller's activity value could not be serialized.
    #[error("publish: activity is not serializable: {0}")]
    InvalidActivity(#[source] serde_json::Error),
}

impl SessionError {
    /// Which operation failed.
    pub fn phase(&self) -> Phase {
        match self {
            SessionError::ConnectionUnavailable { .. } => Phase::Connect,
            SessionError::HandshakeRejected { .. } => Phase::Handshake,
            SessionError::ConnectionClosed { phase }
            | SessionError::MalformedFrame { phase, .. }
            | SessionError::Io { phase, .. }
            | SessionError::InvalidState { phase, .. }
            | SessionError::RequestTooLarge { phase, .. } => *phase,
            SessionError::InvalidActivity(_) => Phase::Publish,
        }
    }

    /// True when the session can no longer be used.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SessionError::InvalidActivity(_)
                | SessionError::InvalidState { .. }
                | SessionError::RequestTooLarge { .. }
        )
    }

    pub(crate) fn from_transport(err: TransportError) -> Self {
        match err {
            TransportError::Unavailable { attempts } => {
                SessionError::ConnectionUnavailable { attempts }
            }
            TransportError::Connect { source, .. } | TransportError::Io(source) => {
                SessionError::Io {
                    phase: Phase::Connect,
                    source,
                }
            }
        }
    }

    /// Map a failed send. Errors raised while encoding never touched the
    /// channel and come back as `Ok`.
    pub(crate) fn from_unsent(
        phase: Phase,
        err: FrameError,
    ) -> std::result::Result<Self, FrameError> {
        match err {
            FrameError::PayloadTooLarge { size, max } => {
                Ok(SessionError::RequestTooLarge { phase, size, max })
            }
            FrameError::Encode(source) => Ok(SessionError::InvalidActivity(source)),
            other => Err(other),
        }
    }

    pub(crate) fn from_frame(phase: Phase, err: FrameError) -> Self {
        match err {
            FrameError::ConnectionClosed { .. } => SessionError::ConnectionClosed { phase },
            FrameError::Io(source) => SessionError::Io { phase, source },
            other => SessionError::MalformedFrame {
                phase,
                source: other,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_errors_keep_their_phase() {
        let closed = SessionError::from_frame(
            Phase::Publish,
            FrameError::ConnectionClosed {
                expected: 8,
                received: 3,
            },
        );
        assert!(matches!(
            closed,
            SessionError::ConnectionClosed {
                phase: Phase::Publish
            }
        ));

        let malformed = SessionError::from_frame(Phase::Handshake, FrameError::UnknownOpcode(5));
        assert_eq!(malformed.phase(), Phase::Handshake);
        assert!(malformed.to_string().starts_with("handshake: malformed frame"));
    }

    #[test]
    fn unavailable_maps_to_connection_unavailable() {
        let err = SessionError::from_transport(TransportError::Unavailable { attempts: 10 });
        assert!(matches!(
            err,
            SessionError::ConnectionUnavailable { attempts: 10 }
        ));
        assert_eq!(err.phase(), Phase::Connect);
        assert!(err.is_fatal());
    }

    #[test]
    fn state_errors_are_not_fatal() {
        let err = SessionError::InvalidState {
            phase: Phase::Publish,
            state: SessionState::Closed,
        };
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "publish: session is closed");
    }

    #[test]
    fn oversized_request_is_not_fatal() {
        let err = SessionError::from_unsent(
            Phase::Publish,
            FrameError::PayloadTooLarge {
                size: 1139,
                max: 256,
            },
        )
        .unwrap();
        assert!(matches!(
            err,
            SessionError::RequestTooLarge {
                phase: Phase::Publish,
                size: 1139,
                max: 256
            }
        ));
        assert!(!err.is_fatal());

        let io = SessionError::from_unsent(
            Phase::Publish,
            FrameError::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe)),
        );
        assert!(io.is_err());
    }
}
