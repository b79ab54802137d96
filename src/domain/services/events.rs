#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::SessionSnapshot;

/// Terminal side events the presentation reacts to.
#[derive(Debug)]
pub enum UiEvent {
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardPaste(String),
    /// New terminal width in columns.
    Resize(u16),
    /// The session controller stopped publishing snapshots.
    SessionClosed(),
    SnapshotChanged(),
    UIScrollDown(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UIScrollUp(),
    UITick(),
}

pub struct EventsService {
    crossterm_events: EventStream,
    snapshots: watch::Receiver<SessionSnapshot>,
    snapshots_open: bool,
}

impl EventsService {
    pub fn new(snapshots: watch::Receiver<SessionSnapshot>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            snapshots,
            snapshots_open: true,
        };
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        return self.snapshots.borrow().clone();
    }

    fn handle_crossterm(event: CrosstermEvent) -> Option<UiEvent> {
        match event {
            CrosstermEvent::Paste(text) => {
                return Some(UiEvent::KeyboardPaste(text));
            }
            CrosstermEvent::Resize(cols, _) => {
                return Some(UiEvent::Resize(cols));
            }
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => {
                    return Some(UiEvent::UIScrollUp());
                }
                MouseEventKind::ScrollDown => {
                    return Some(UiEvent::UIScrollDown());
                }
                _ => {
                    return None;
                }
            },
            CrosstermEvent::Key(keyevent) => match keyevent.into() {
                Input { key: Key::Down, .. } => {
                    return Some(UiEvent::UIScrollDown());
                }
                Input { key: Key::Up, .. } => {
                    return Some(UiEvent::UIScrollUp());
                }
                Input {
                    key: Key::PageDown, ..
                } => {
                    return Some(UiEvent::UIScrollPageDown());
                }
                Input {
                    key: Key::PageUp, ..
                } => {
                    return Some(UiEvent::UIScrollPageUp());
                }
                Input {
                    key: Key::Char('d'),
                    ctrl: true,
                    ..
                } => {
                    return Some(UiEvent::UIScrollPageDown());
                }
                Input {
                    key: Key::Char('u'),
                    ctrl: true,
                    ..
                } => {
                    return Some(UiEvent::UIScrollPageUp());
                }
                Input {
                    key: Key::Char('c'),
                    ctrl: true,
                    ..
                } => {
                    return Some(UiEvent::KeyboardCTRLC());
                }
                Input { key: Key::Esc, .. } => {
                    return Some(UiEvent::KeyboardEsc());
                }
                Input {
                    key: Key::Enter, ..
                } => {
                    return Some(UiEvent::KeyboardEnter());
                }
                input => {
                    return Some(UiEvent::KeyboardCharInput(input));
                }
            },
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<UiEvent> {
        loop {
            let evt = tokio::select! {
                res = self.snapshots.changed(), if self.snapshots_open => match res {
                    Ok(()) => Some(UiEvent::SnapshotChanged()),
                    Err(_) => {
                        self.snapshots_open = false;
                        Some(UiEvent::SessionClosed())
                    }
                },
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => EventsService::handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(UiEvent::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
