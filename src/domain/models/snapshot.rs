use super::Message;

/// Read-only view of a session handed to presentation consumers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub animated_message: Option<usize>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub is_minimized: bool,
    pub is_mobile: bool,
    pub is_typing: bool,
    pub is_visible: bool,
    pub messages: Vec<Message>,
    pub quick_replies: Vec<String>,
    pub session_ended: bool,
    pub show_quick_replies: bool,
    pub typing_indicator: bool,
}
