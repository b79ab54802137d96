#[cfg(test)]
#[path = "loading_test.rs"]
mod tests;

use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::SessionSnapshot;

const MAX_DOTS: usize = 3;

/// Placeholder drawn where the input sits until the first connection opens.
/// Each tick adds a trailing dot so a slow connect still looks alive.
#[derive(Default)]
pub struct Loading {
    dots: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.dots = (self.dots + 1) % (MAX_DOTS + 1);
    }

    pub fn label(&self, snapshot: &SessionSnapshot) -> String {
        let text = if snapshot.is_mobile {
            "Connecting"
        } else {
            "Connecting to the assistant"
        };

        return format!("{text}{}", ".".repeat(self.dots));
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, snapshot: &SessionSnapshot) {
        let block = if snapshot.is_mobile {
            Block::default().borders(Borders::TOP)
        } else {
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
        };

        frame.render_widget(
            Paragraph::new(self.label(snapshot))
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .alignment(Alignment::Center),
            rect,
        );
    }
}
