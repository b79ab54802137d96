use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::sync::watch;

use crate::domain::models::help_text;
use crate::domain::models::Action;
use crate::domain::models::Loading;
use crate::domain::models::SessionSnapshot;
use crate::domain::models::SlashCommand;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::events::UiEvent;
use crate::domain::services::Scroll;
use crate::domain::services::PAGE_LINES;
use crate::domain::services::Transcript;

/// Approximate logical pixels per terminal column, used to compare the
/// terminal against the mobile breakpoint.
const PIXELS_PER_COLUMN: u32 = 8;

fn width_in_pixels(cols: u16) -> u32 {
    return u32::from(cols) * PIXELS_PER_COLUMN;
}

fn render_minimized<B: Backend>(frame: &mut Frame<B>, rect: Rect, snapshot: &SessionSnapshot) {
    let text = if snapshot.session_ended {
        "Chat ended. Type /restore to start again or /quit to exit."
    } else {
        "Chat minimized. Type /restore to reopen it."
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        rect,
    );
}

fn render_banner<B: Backend>(frame: &mut Frame<B>, rect: Rect, text: &str, color: Color) {
    frame.render_widget(
        Paragraph::new(text.to_string())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::BOTTOM)),
        rect,
    );
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    tx: mpsc::UnboundedSender<Action>,
    snapshots: watch::Receiver<SessionSnapshot>,
) -> Result<()> {
    let mut events = EventsService::new(snapshots);
    let mut snapshot = events.snapshot();
    let mut compact = snapshot.is_mobile;
    let mut textarea = if compact {
        TextArea::compact()
    } else {
        TextArea::default()
    };
    let mut loading = Loading::default();
    let mut scroll = Scroll::default();
    let mut notice: Option<String> = None;

    let (cols, _) = terminal::size()?;
    tx.send(Action::Resize(width_in_pixels(cols)))?;

    loop {
        if snapshot.is_mobile != compact {
            compact = snapshot.is_mobile;
            let lines = textarea.lines().to_vec();
            textarea = if compact {
                TextArea::compact()
            } else {
                TextArea::default()
            };
            for (idx, line) in lines.iter().enumerate() {
                if idx > 0 {
                    textarea.insert_newline();
                }
                textarea.insert_str(line);
            }
        }

        terminal.draw(|frame| {
            let banner = notice.clone().or_else(|| return snapshot.error.clone());
            let input_height = if compact { 2 } else { 3 };
            let banner_height = banner
                .as_ref()
                .map(|text| return u16::try_from(text.lines().count() + 1).unwrap_or(u16::MAX))
                .unwrap_or(0);

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(banner_height),
                    Constraint::Min(1),
                    Constraint::Length(input_height),
                ])
                .split(frame.size());

            if let Some(text) = &banner {
                let color = if notice.is_some() {
                    Color::Blue
                } else {
                    Color::Red
                };
                render_banner(frame, layout[0], text, color);
            }

            if snapshot.is_minimized {
                render_minimized(frame, layout[1], &snapshot);
            } else {
                let lines = Transcript::new(layout[1].width.saturating_sub(1).into())
                    .lines(&snapshot);
                scroll.resize(
                    u16::try_from(lines.len()).unwrap_or(u16::MAX),
                    layout[1].height,
                );

                frame.render_widget(
                    Paragraph::new(lines).scroll((scroll.position(), 0)),
                    layout[1],
                );
                frame.render_stateful_widget(
                    Scrollbar::new(ScrollbarOrientation::VerticalRight),
                    layout[1],
                    scroll.scrollbar_state(),
                );
            }

            if snapshot.is_loading {
                loading.render(frame, layout[2], &snapshot);
            } else {
                frame.render_widget(textarea.widget(), layout[2]);
            }
        })?;

        match events.next().await? {
            UiEvent::SnapshotChanged() => {
                snapshot = events.snapshot();
            }
            UiEvent::SessionClosed() => {
                break;
            }
            UiEvent::Resize(cols) => {
                tx.send(Action::Resize(width_in_pixels(cols)))?;
            }
            UiEvent::UIScrollDown() => {
                scroll.down(1);
            }
            UiEvent::UIScrollUp() => {
                scroll.up(1);
            }
            UiEvent::UIScrollPageDown() => {
                scroll.down(PAGE_LINES);
            }
            UiEvent::UIScrollPageUp() => {
                scroll.up(PAGE_LINES);
            }
            UiEvent::KeyboardCTRLC() => {
                tx.send(Action::Quit())?;
                break;
            }
            UiEvent::KeyboardEsc() => {
                notice = None;
                tx.send(Action::DismissError())?;
            }
            UiEvent::KeyboardPaste(text) => {
                textarea.insert_str(text.replace(['\r', '\n'], " "));
                tx.send(Action::Keystroke())?;
            }
            UiEvent::KeyboardCharInput(input) => {
                textarea.input(input);
                tx.send(Action::Keystroke())?;
            }
            UiEvent::KeyboardEnter() => {
                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() {
                    continue;
                }
                let command = SlashCommand::parse(&input_str);
                if command.is_none() && snapshot.is_loading {
                    continue;
                }
                textarea = if compact {
                    TextArea::compact()
                } else {
                    TextArea::default()
                };
                notice = None;
                scroll.follow();

                if let Some(command) = command {
                    if command.is_quit() {
                        tx.send(Action::Quit())?;
                        break;
                    }
                    if command.is_help() {
                        notice = Some(help_text().to_string());
                        continue;
                    }
                    if let Some(action) = command.action() {
                        tx.send(action)?;
                    }
                    continue;
                }

                tx.send(Action::Send(input_str))?;
            }
            UiEvent::UITick() => {
                if snapshot.is_loading {
                    loading.tick();
                }
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    snapshots: watch::Receiver<SessionSnapshot>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, tx, snapshots).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}
