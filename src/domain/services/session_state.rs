#[cfg(test)]
#[path = "session_state_test.rs"]
mod tests;

use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SessionSnapshot;

pub const CONNECT_ERROR: &str = "Failed to connect to the server. Please try again later.";
pub const DISCONNECT_ERROR: &str = "Connection lost. Reconnecting...";
pub const GENERIC_ERROR: &str = "An error occurred";

/// Conversation state for a single widget. Every transition is a plain method
/// so the whole machine can be driven without a transport.
pub struct SessionState {
    greeting: Message,
    quick_replies: Vec<String>,
    assistant_id: String,

    pub messages: Vec<Message>,
    pub is_typing: bool,
    pub is_loading: bool,
    pub is_minimized: bool,
    pub is_visible: bool,
    pub session_ended: bool,
    pub error: Option<String>,
    pub show_quick_replies: bool,
    pub animated_message: Option<usize>,

    // Set when a response lands after the last typing signal, so the typing
    // indicator can end without waiting on a late stopTyping.
    content_since_typing: bool,
}

impl SessionState {
    pub fn new(greeting: &str, quick_replies: Vec<String>, assistant_id: &str) -> SessionState {
        let greeting = Message::new(Role::Assistant, greeting);
        return SessionState {
            messages: vec![greeting.clone()],
            greeting,
            quick_replies,
            assistant_id: assistant_id.to_string(),
            is_typing: false,
            is_loading: true,
            is_minimized: false,
            is_visible: true,
            session_ended: false,
            error: None,
            show_quick_replies: true,
            animated_message: None,
            content_since_typing: false,
        };
    }

    pub fn quick_replies(&self) -> &[String] {
        return &self.quick_replies;
    }

    /// What the presentation should show as "assistant is typing". Content
    /// arriving after the last typing signal ends the indicator even if the
    /// backend never sends stopTyping.
    pub fn typing_indicator(&self) -> bool {
        return self.is_typing && !self.content_since_typing;
    }

    pub fn handle_connect_success(&mut self) {
        self.is_loading = false;
    }

    pub fn handle_connect_error(&mut self, msg: &str) {
        self.is_loading = false;
        self.error = Some(msg.to_string());
    }

    pub fn handle_disconnect(&mut self) {
        self.error = Some(DISCONNECT_ERROR.to_string());
    }

    pub fn handle_remote_response(&mut self, text: &str) {
        self.messages.push(Message::new(Role::Assistant, text));
        self.show_quick_replies = false;
        self.animated_message = Some(self.messages.len() - 1);
        self.content_since_typing = true;
    }

    pub fn handle_remote_typing(&mut self, sender: &str) {
        if sender != self.assistant_id {
            return;
        }

        self.is_typing = true;
        self.content_since_typing = false;
    }

    pub fn handle_remote_stop_typing(&mut self, sender: &str) {
        if sender != self.assistant_id {
            return;
        }

        self.is_typing = false;
    }

    pub fn handle_remote_error(&mut self, msg: Option<String>) {
        let text = msg
            .filter(|e| return !e.trim().is_empty())
            .unwrap_or_else(|| return GENERIC_ERROR.to_string());
        self.error = Some(text);
    }

    /// Appends a user message. Returns the text to emit to the backend, or
    /// `None` when the send is a no-op (blank text or no live connection).
    pub fn handle_user_send(&mut self, text: &str, live: bool) -> Option<String> {
        if text.trim().is_empty() || !live {
            return None;
        }

        self.messages.push(Message::new(Role::User, text));
        self.show_quick_replies = false;
        // Optimistic: the backend is expected to start answering, and any
        // stale typing signal from before is overridden.
        self.is_typing = true;
        self.content_since_typing = false;
        self.animated_message = None;

        return Some(text.to_string());
    }

    pub fn handle_quick_reply(&mut self, idx: usize, live: bool) -> Option<String> {
        if !self.show_quick_replies {
            return None;
        }

        let reply = self.quick_replies.get(idx)?.to_string();
        return self.handle_user_send(&reply, live);
    }

    pub fn minimize(&mut self) {
        self.is_minimized = true;
        self.is_visible = false;
    }

    pub fn restore(&mut self) {
        if self.session_ended {
            self.reset();
            self.session_ended = false;
        }

        self.is_minimized = false;
        self.is_visible = true;
    }

    pub fn end_session(&mut self) {
        self.minimize();
        self.session_ended = true;
    }

    pub fn clear_chat(&mut self) {
        self.reset();
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn reset(&mut self) {
        self.messages = vec![self.greeting.clone()];
        self.show_quick_replies = true;
        self.is_typing = false;
        self.content_since_typing = false;
        self.animated_message = None;
    }

    pub fn snapshot(&self, is_mobile: bool) -> SessionSnapshot {
        return SessionSnapshot {
            animated_message: self.animated_message,
            error: self.error.clone(),
            is_loading: self.is_loading,
            is_minimized: self.is_minimized,
            is_mobile,
            is_typing: self.is_typing,
            is_visible: self.is_visible,
            messages: self.messages.clone(),
            quick_replies: self.quick_replies.clone(),
            session_ended: self.session_ended,
            show_quick_replies: self.show_quick_replies,
            typing_indicator: self.typing_indicator(),
        };
    }
}
