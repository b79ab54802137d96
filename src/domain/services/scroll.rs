#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

use ratatui::widgets::ScrollbarState;

pub const PAGE_LINES: u16 = 10;

/// Scroll position over the transcript. Follows the newest line until the
/// user scrolls up, and follows again once they scroll back to the bottom or
/// send a message.
#[derive(Default)]
pub struct Scroll {
    content_height: u16,
    viewport_height: u16,
    /// Pinned top line. `None` follows the bottom.
    pinned: Option<u16>,
    scrollbar_state: ScrollbarState,
}

impl Scroll {
    fn max_position(&self) -> u16 {
        return self.content_height.saturating_sub(self.viewport_height);
    }

    pub fn is_following(&self) -> bool {
        return self.pinned.is_none();
    }

    /// First visible line.
    pub fn position(&self) -> u16 {
        return self
            .pinned
            .map(|top| return top.min(self.max_position()))
            .unwrap_or_else(|| return self.max_position());
    }

    pub fn up(&mut self, lines: u16) {
        self.pinned = Some(self.position().saturating_sub(lines));
    }

    pub fn down(&mut self, lines: u16) {
        let position = self.position().saturating_add(lines);
        if position >= self.max_position() {
            self.follow();
            return;
        }
        self.pinned = Some(position);
    }

    pub fn follow(&mut self) {
        self.pinned = None;
    }

    /// Called on every draw with the laid out transcript height.
    pub fn resize(&mut self, content_height: u16, viewport_height: u16) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        if let Some(top) = self.pinned {
            self.pinned = Some(top.min(self.max_position()));
        }
    }

    pub fn scrollbar_state(&mut self) -> &mut ScrollbarState {
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(self.content_height)
            .viewport_content_length(self.viewport_height)
            .position(self.position());
        return &mut self.scrollbar_state;
    }
}
