use presence_frame::{Frame, FrameConfig, FramedStream, Opcode};
use presence_transport::{discover, IpcStream, LocalChannel};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::activity::{ActivityRequest, CurrentProcess, ProcessIdentity, PublishOutcome};
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::handshake::{is_ready, HandshakeRequest};
use crate::state::{Phase, SessionState};

/// A client session with the peer application.
///
/// The session exclusively owns its channel. All operations are blocking and
/// take `&mut self`; exactly one request is in flight at any time.
pub struct Session<C: LocalChannel = IpcStream> {
    state: SessionState,
    channel: Option<FramedStream<C>>,
    identity: Box<dyn ProcessIdentity>,
    ready_data: Option<Value>,
}

impl Session<IpcStream> {
    /// Discover the peer, handshake as `client_id`, and return once READY.
    pub fn initialize(client_id: impl Into<String>) -> Result<Self> {
        Self::initialize_with_config(client_id, &SessionConfig::default())
    }

    /// Like [`Session::initialize`] with explicit configuration.
    pub fn initialize_with_config(
        client_id: impl Into<String>,
        config: &SessionConfig,
    ) -> Result<Self> {
        let stream = discover(&config.discovery).map_err(SessionError::from_transport)?;
        let mut session = Session::from_channel(stream, config.frame.clone());
        session.handshake(client_id)?;
        Ok(session)
    }
}

impl<C: LocalChannel> Session<C> {
    /// Attach an already opened channel. The session starts `Connected`.
    pub fn from_channel(channel: C, config: FrameConfig) -> Self {
        let mut session = Self {
            state: SessionState::Disconnected,
            channel: None,
            identity: Box::new(CurrentProcess),
            ready_data: None,
        };
        session.channel = Some(FramedStream::with_config(channel, config));
        session.transition(SessionState::Connected);
        session
    }

    /// Report a different process id with activity updates.
    pub fn with_process_identity(mut self, identity: impl ProcessIdentity + 'static) -> Self {
        self.identity = Box::new(identity);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The `data` object of the peer's READY dispatch, once ready.
    pub fn ready_data(&self) -> Option<&Value> {
        self.ready_data.as_ref()
    }

    /// Send the handshake and wait for the peer's READY dispatch.
    ///
    /// Any other reply closes the channel and fails the session with
    /// [`SessionError::HandshakeRejected`].
    pub fn handshake(&mut self, client_id: impl Into<String>) -> Result<()> {
        self.expect_state(SessionState::Connected, Phase::Handshake)?;

        let request = HandshakeRequest::new(client_id);
        debug!(client_id = %request.client_id, "sending handshake");
        self.send(Phase::Handshake, Opcode::Handshake, &request)?;
        self.transition(SessionState::AwaitingReady);

        let frame = self.recv(Phase::Handshake)?;
        if is_ready(&frame) {
            self.ready_data = frame.payload.get("data").cloned();
            self.transition(SessionState::Ready);
            info!("connected to peer");
            return Ok(());
        }

        warn!(opcode = %frame.opcode, payload = %frame.payload, "handshake rejected");
        self.close_quietly();
        self.state = SessionState::Failed;
        Err(SessionError::HandshakeRejected {
            opcode: frame.opcode,
            payload: frame.payload,
        })
    }

    /// Push an activity update and wait for the peer's answer.
    ///
    /// The value is forwarded verbatim. A refusal from the peer comes back as
    /// [`PublishOutcome::Rejected`] and leaves the session ready, as does an
    /// activity too large to frame ([`SessionError::RequestTooLarge`]).
    /// Transport failures end the session.
    pub fn publish<A: Serialize + ?Sized>(&mut self, activity: &A) -> Result<PublishOutcome> {
        self.expect_state(SessionState::Ready, Phase::Publish)?;
        let activity = serde_json::to_value(activity).map_err(SessionError::InvalidActivity)?;
        self.set_activity(activity)
    }

    /// Clear the activity shown by the peer.
    pub fn clear(&mut self) -> Result<PublishOutcome> {
        self.expect_state(SessionState::Ready, Phase::Publish)?;
        self.set_activity(Value::Null)
    }

    fn set_activity(&mut self, activity: Value) -> Result<PublishOutcome> {
        let request = ActivityRequest::set_activity(self.identity.pid(), activity);
        debug!(nonce = %request.nonce, "publishing activity");
        self.send(Phase::Publish, Opcode::Message, &request)?;

        let frame = self.recv(Phase::Publish)?;
        if frame.opcode == Opcode::Close {
            warn!(payload = %frame.payload, "peer closed the session");
            self.release();
            self.state = SessionState::Failed;
            return Err(SessionError::ConnectionClosed {
                phase: Phase::Publish,
            });
        }

        let outcome = PublishOutcome::from_response(frame.payload);
        if let PublishOutcome::Rejected { message, .. } = &outcome {
            warn!(%message, "peer rejected activity");
        }
        Ok(outcome)
    }

    /// Send a Close frame and release the channel.
    ///
    /// The channel is released whether or not the Close frame could be
    /// written. Calling this again after the channel is gone does nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut framed) = self.channel.take() else {
            debug!(state = %self.state, "close on released session");
            return Ok(());
        };

        let sent = framed.send(Opcode::Close, &serde_json::Map::new());
        let released = framed.into_inner().release();
        self.state = SessionState::Closed;
        info!("session closed");

        if let Err(err) = sent {
            if let Err(release_err) = &released {
                warn!(error = %release_err, "failed to release channel");
            }
            return Err(SessionError::from_frame(Phase::Close, err));
        }
        released.map_err(|source| SessionError::Io {
            phase: Phase::Close,
            source,
        })
    }

    fn close_quietly(&mut self) {
        if let Err(err) = self.close() {
            debug!(error = %err, "close after failure");
        }
    }

    fn send<T: Serialize + ?Sized>(&mut self, phase: Phase, opcode: Opcode, value: &T) -> Result<()> {
        let result = self.framed(phase)?.send(opcode, value);
        result.map_err(|err| match SessionError::from_unsent(phase, err) {
            Ok(unsent) => {
                debug!(%phase, error = %unsent, "request not sent");
                unsent
            }
            Err(err) => self.fail(phase, SessionError::from_frame(phase, err)),
        })
    }

    fn recv(&mut self, phase: Phase) -> Result<Frame> {
        let result = self.framed(phase)?.recv();
        result.map_err(|err| self.fail(phase, SessionError::from_frame(phase, err)))
    }

    fn framed(&mut self, phase: Phase) -> Result<&mut FramedStream<C>> {
        let state = self.state;
        self.channel
            .as_mut()
            .ok_or(SessionError::InvalidState { phase, state })
    }

    fn fail(&mut self, phase: Phase, err: SessionError) -> SessionError {
        warn!(%phase, error = %err, "session failed");
        self.release();
        self.state = SessionState::Failed;
        err
    }

    fn release(&mut self) {
        if let Some(framed) = self.channel.take() {
            if let Err(err) = framed.into_inner().release() {
                debug!(error = %err, "failed to release channel");
            }
        }
    }

    fn expect_state(&self, expected: SessionState, phase: Phase) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                phase,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = %self.state, to = %next, "session state");
        self.state = next;
    }
}

impl<C: LocalChannel> Drop for Session<C> {
    fn drop(&mut self) {
        if self.channel.is_some() {
            self.close_quietly();
        }
    }
}

impl<C: LocalChannel> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("has_channel", &self.channel.is_some())
            .finish()
    }
}
