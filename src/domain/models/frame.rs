#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Messages exchanged with the page embedding the widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameMessage {
    RequestViewportInfo,
    ViewportInfo {
        #[serde(rename = "isMobile")]
        is_mobile: bool,
    },
}

impl FrameMessage {
    /// Returns `None` for anything that is not a JSON object tagged with a
    /// known `type`.
    pub fn parse(data: &str) -> Option<FrameMessage> {
        return serde_json::from_str::<FrameMessage>(data).ok();
    }
}
