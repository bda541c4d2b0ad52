use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command name for activity updates.
pub const SET_ACTIVITY: &str = "SET_ACTIVITY";

/// A SET_ACTIVITY request, sent with `Opcode::Message`.
///
/// Serializes as
/// `{"cmd":"SET_ACTIVITY","args":{"pid":<pid>,"activity":<value>},"nonce":"<uuid>"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRequest {
    pub cmd: String,
    pub args: ActivityArgs,
    /// Correlation token for the peer. Only one request is ever in flight,
    /// so responses are not matched against it.
    pub nonce: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityArgs {
    pub pid: u32,
    /// Opaque activity value; `null` clears the current activity.
    pub activity: Value,
}

impl ActivityRequest {
    /// Build a request with a freshly generated nonce.
    pub fn set_activity(pid: u32, activity: Value) -> Self {
        Self {
            cmd: SET_ACTIVITY.to_string(),
            args: ActivityArgs { pid, activity },
            nonce: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// How the peer answered an activity update.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// The peer acknowledged the update.
    Accepted(Value),
    /// The request was well-formed but the peer refused it. The session
    /// stays usable.
    Rejected { message: String, response: Value },
}

impl PublishOutcome {
    /// Classify a response by its `data.message` field.
    pub fn from_response(response: Value) -> Self {
        let message = response
            .get("data")
            .and_then(|data| data.get("message"))
            .map(|message| match message {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            });

        match message {
            Some(message) => PublishOutcome::Rejected { message, response },
            None => PublishOutcome::Accepted(response),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, PublishOutcome::Accepted(_))
    }

    /// The peer's raw response.
    pub fn response(&self) -> &Value {
        match self {
            PublishOutcome::Accepted(response) | PublishOutcome::Rejected { response, .. } => {
                response
            }
        }
    }
}

/// Source of the process id reported with each activity update.
pub trait ProcessIdentity: Send {
    fn pid(&self) -> u32;
}

/// The running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentProcess;

impl ProcessIdentity for CurrentProcess {
    fn pid(&self) -> u32 {
        std::process::id()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_serializes_in_wire_shape() {
        let request = ActivityRequest::set_activity(4242, json!({"details": "Editing a beatmap"}));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["cmd"], "SET_ACTIVITY");
        assert_eq!(value["args"]["pid"], 4242);
        assert_eq!(value["args"]["activity"]["details"], "Editing a beatmap");
        assert!(value["nonce"].as_str().is_some_and(|n| !n.is_empty()));

        let text = serde_json::to_string(&request).unwrap();
        assert!(text.starts_with(r#"{"cmd":"SET_ACTIVITY","args":{"pid":4242,"activity":"#));
    }

    #[test]
    fn nonces_are_unique() {
        let a = ActivityRequest::set_activity(1, Value::Null);
        let b = ActivityRequest::set_activity(1, Value::Null);
        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn response_without_message_is_accepted() {
        let response = json!({"cmd": "SET_ACTIVITY", "data": {"details": "In menus"}, "evt": null});
        let outcome = PublishOutcome::from_response(response.clone());
        assert_eq!(outcome, PublishOutcome::Accepted(response));
    }

    #[test]
    fn response_with_message_is_rejected() {
        let response = json!({
            "cmd": "SET_ACTIVITY",
            "evt": "ERROR",
            "data": {"code": 4000, "message": "child \"activity\" fails"}
        });
        match PublishOutcome::from_response(response) {
            PublishOutcome::Rejected { message, response } => {
                assert_eq!(message, "child \"activity\" fails");
                assert_eq!(response["data"]["code"], 4000);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn non_string_message_is_stringified() {
        let outcome = PublishOutcome::from_response(json!({"data": {"message": 17}}));
        assert!(matches!(outcome, PublishOutcome::Rejected { ref message, .. } if message == "17"));
        assert!(!outcome.is_accepted());
    }

    #[test]
    fn current_process_reports_std_pid() {
        assert_eq!(CurrentProcess.pid(), std::process::id());
    }
}
