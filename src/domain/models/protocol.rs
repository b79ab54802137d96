#[cfg(test)]
#[path = "protocol_test.rs"]
mod tests;

use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct MessagePayload {
    message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SenderPayload {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}

/// Events the client sends to the assistant backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    StartChat,
    Message(String),
    Typing,
    StopTyping,
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::StartChat => return "startChat",
            ClientEvent::Message(_) => return "message",
            ClientEvent::Typing => return "typing",
            ClientEvent::StopTyping => return "stopTyping",
        }
    }

    pub fn payload(&self) -> Result<Option<Value>> {
        if let ClientEvent::Message(message) = self {
            let payload = serde_json::to_value(MessagePayload {
                message: message.to_string(),
            })?;
            return Ok(Some(payload));
        }

        return Ok(None);
    }
}

/// Events the assistant backend sends to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerEvent {
    Response(String),
    Typing(String),
    StopTyping(String),
    Error(Option<String>),
}

impl ServerEvent {
    /// Parses a named event and its first argument. Events this client does
    /// not understand return `None`; known events with a malformed payload
    /// return an error.
    pub fn parse(name: &str, payload: Option<Value>) -> Result<Option<ServerEvent>> {
        let payload = payload.unwrap_or(Value::Null);

        match name {
            "response" => {
                let res: MessagePayload = serde_json::from_value(payload)?;
                return Ok(Some(ServerEvent::Response(res.message)));
            }
            "typing" => {
                let res: SenderPayload = serde_json::from_value(payload)?;
                return Ok(Some(ServerEvent::Typing(res.session_id)));
            }
            "stopTyping" => {
                let res: SenderPayload = serde_json::from_value(payload)?;
                return Ok(Some(ServerEvent::StopTyping(res.session_id)));
            }
            "error" => {
                if payload.is_null() {
                    return Ok(Some(ServerEvent::Error(None)));
                }
                let res: ErrorPayload = serde_json::from_value(payload).unwrap_or_default();
                return Ok(Some(ServerEvent::Error(res.message)));
            }
            _ => {
                return Ok(None);
            }
        }
    }
}
