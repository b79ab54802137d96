use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label shown above chat bubbles.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => return "You",
            Role::Assistant => return "Assistant",
        }
    }
}
