use presence_frame::{Frame, Opcode};
use serde::{Deserialize, Serialize};

/// Handshake protocol version understood by the peer.
pub const PROTOCOL_VERSION: u32 = 1;

const DISPATCH: &str = "DISPATCH";
const READY: &str = "READY";

/// Client handshake request, sent with [`Opcode::Handshake`].
///
/// Serializes as `{"v":1,"client_id":"<id>"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandshakeRequest {
    /// Protocol version.
    pub v: u32,
    /// Application id, as a decimal string.
    pub client_id: String,
}

impl HandshakeRequest {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            v: PROTOCOL_VERSION,
            client_id: client_id.into(),
        }
    }
}

/// Whether `frame` is the peer's READY dispatch.
pub fn is_ready(frame: &Frame) -> bool {
    frame.opcode == Opcode::Message
        && frame.str_field("cmd") == Some(DISPATCH)
        && frame.str_field("evt") == Some(READY)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_serializes_in_wire_order() {
        let payload = serde_json::to_string(&HandshakeRequest::new("123")).unwrap();
        assert_eq!(payload, r#"{"v":1,"client_id":"123"}"#);
    }

    #[test]
    fn ready_dispatch_is_accepted() {
        let frame = Frame::new(
            Opcode::Message,
            json!({"cmd": "DISPATCH", "evt": "READY", "data": {"v": 1}}),
        );
        assert!(is_ready(&frame));
    }

    #[test]
    fn other_replies_are_not_ready() {
        let cases = [
            Frame::new(Opcode::Close, json!({"cmd": "DISPATCH", "evt": "READY"})),
            Frame::new(Opcode::Message, json!({"cmd": "DISPATCH", "evt": "ERROR"})),
            Frame::new(Opcode::Message, json!({"cmd": "AUTHORIZE", "evt": "READY"})),
            Frame::new(Opcode::Message, json!({"code": 4000, "message": "Invalid Client ID"})),
            Frame::new(Opcode::Handshake, json!({})),
        ];
        for frame in &cases {
            assert!(!is_ready(frame), "{frame:?} should not be READY");
        }
    }
}
