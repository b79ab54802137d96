#[cfg(test)]
#[path = "packet_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    pub sid: String,
    #[serde(rename = "pingInterval", default)]
    pub ping_interval: u64,
    #[serde(rename = "pingTimeout", default)]
    pub ping_timeout: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ConnectPayload {
    sid: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ConnectErrorPayload {
    message: Option<String>,
}

/// One engine.io text frame, with the socket.io packet it carries when it is
/// a message frame. Only the default namespace is supported.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Connect(Option<String>),
    Disconnect,
    Event(String, Option<Value>),
    ConnectError(Option<String>),
    Noop,
}

impl Packet {
    pub fn decode(text: &str) -> Result<Packet> {
        let mut chars = text.chars();
        let Some(engine_type) = chars.next() else {
            bail!("Empty packet");
        };
        let rest = chars.as_str();

        match engine_type {
            '0' => {
                let handshake: Handshake = serde_json::from_str(rest)?;
                return Ok(Packet::Open(handshake));
            }
            '1' => return Ok(Packet::Close),
            '2' => return Ok(Packet::Ping),
            '3' => return Ok(Packet::Pong),
            '4' => return Packet::decode_socket(rest),
            '6' => return Ok(Packet::Noop),
            _ => bail!(format!("Unsupported engine.io packet type '{engine_type}'")),
        }
    }

    fn decode_socket(text: &str) -> Result<Packet> {
        let mut chars = text.chars();
        let Some(socket_type) = chars.next() else {
            bail!("Empty socket.io packet");
        };
        let rest = chars.as_str();

        match socket_type {
            '0' => {
                if rest.is_empty() {
                    return Ok(Packet::Connect(None));
                }
                let payload: ConnectPayload = serde_json::from_str(rest)?;
                return Ok(Packet::Connect(payload.sid));
            }
            '1' => return Ok(Packet::Disconnect),
            '2' => {
                let mut args: Vec<Value> = serde_json::from_str(rest)?;
                if args.is_empty() {
                    bail!("Event packet without a name");
                }
                let Value::String(name) = args.remove(0) else {
                    bail!("Event packet name is not a string");
                };
                let payload = if args.is_empty() {
                    None
                } else {
                    Some(args.remove(0))
                };
                return Ok(Packet::Event(name, payload));
            }
            '4' => {
                let payload: ConnectErrorPayload =
                    serde_json::from_str(rest).unwrap_or_default();
                return Ok(Packet::ConnectError(payload.message));
            }
            _ => bail!(format!("Unsupported socket.io packet type '{socket_type}'")),
        }
    }

    pub fn encode(&self) -> Result<String> {
        match self {
            Packet::Open(handshake) => {
                return Ok(format!("0{}", serde_json::to_string(handshake)?));
            }
            Packet::Close => return Ok("1".to_string()),
            Packet::Ping => return Ok("2".to_string()),
            Packet::Pong => return Ok("3".to_string()),
            Packet::Connect(None) => return Ok("40".to_string()),
            Packet::Connect(Some(sid)) => {
                let payload = serde_json::to_string(&ConnectPayload {
                    sid: Some(sid.to_string()),
                })?;
                return Ok(format!("40{payload}"));
            }
            Packet::Disconnect => return Ok("41".to_string()),
            Packet::Event(name, payload) => {
                let mut args = vec![Value::String(name.to_string())];
                if let Some(payload) = payload {
                    args.push(payload.clone());
                }
                return Ok(format!("42{}", serde_json::to_string(&args)?));
            }
            Packet::ConnectError(message) => {
                let payload = serde_json::to_string(&ConnectErrorPayload {
                    message: message.clone(),
                })?;
                return Ok(format!("44{payload}"));
            }
            Packet::Noop => return Ok("6".to_string()),
        }
    }
}
