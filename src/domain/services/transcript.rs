#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SessionSnapshot;

const TYPING_TEXT: &str = "Assistant is typing...";

fn pad_left(text_len: usize, width: usize) -> String {
    return " ".repeat(width.saturating_sub(text_len));
}

/// Lays out a snapshot's conversation as terminal lines: assistant messages on
/// the left, user messages on the right, followed by the typing indicator and
/// the quick replies while they are offered.
pub struct Transcript {
    width: usize,
}

impl Transcript {
    pub fn new(width: usize) -> Transcript {
        return Transcript { width };
    }

    fn bubble_width(&self, is_mobile: bool) -> usize {
        if is_mobile {
            return self.width;
        }

        return (self.width * 3 / 4).max(12);
    }

    fn message_lines(
        &self,
        message: &Message,
        is_mobile: bool,
        animated: bool,
    ) -> Vec<Line<'static>> {
        let label_style = match message.role {
            Role::User => Style::default().fg(Color::Cyan),
            Role::Assistant => Style::default().fg(Color::Green),
        };
        let label_style = if animated {
            label_style.add_modifier(Modifier::BOLD)
        } else {
            label_style
        };

        let prefix = "│ ";
        let wrap_width = self
            .bubble_width(is_mobile)
            .saturating_sub(prefix.chars().count());
        let label = message.role.label().to_string();

        let mut rows = vec![(label.chars().count(), Span::styled(label, label_style))];
        for line in message.as_string_lines(wrap_width) {
            let text = format!("{prefix}{}", line.trim_end());
            rows.push((text.chars().count(), Span::raw(text)));
        }

        return rows
            .into_iter()
            .map(|(len, span)| {
                if message.is_user() {
                    return Line::from(vec![Span::raw(pad_left(len, self.width)), span]);
                }
                return Line::from(span);
            })
            .collect();
    }

    pub fn lines(&self, snapshot: &SessionSnapshot) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = vec![];

        for (idx, message) in snapshot.messages.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::from(""));
            }
            let animated = snapshot.animated_message == Some(idx);
            lines.extend(self.message_lines(message, snapshot.is_mobile, animated));
        }

        if snapshot.show_quick_replies && !snapshot.quick_replies.is_empty() {
            lines.push(Line::from(""));
            for (idx, reply) in snapshot.quick_replies.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("/{} {reply}", idx + 1),
                    Style::default().fg(Color::Yellow),
                )));
            }
        }

        if snapshot.typing_indicator {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                TYPING_TEXT,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        return lines;
    }
}
