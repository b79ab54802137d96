#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

use std::future;
use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::time;
use tokio::time::Instant;

use super::session_state::CONNECT_ERROR;
use super::ConnectionManager;
use super::SessionState;
use super::TypingDebouncer;
use super::ViewportNegotiator;
use crate::domain::models::Action;
use crate::domain::models::ClientEvent;
use crate::domain::models::Event;
use crate::domain::models::HostFrameBox;
use crate::domain::models::ServerEvent;
use crate::domain::models::SessionSnapshot;

pub struct SessionOptions {
    pub greeting: String,
    pub quick_replies: Vec<String>,
    pub assistant_id: String,
    pub typing_timeout: Duration,
    pub host_origin: String,
    pub mobile_breakpoint: u32,
}

async fn typing_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            time::sleep_until(deadline).await;
        }
        None => {
            future::pending::<()>().await;
        }
    }
}

/// Composition root for one chat widget. Owns the connection, the session
/// state, the typing debouncer and the viewport negotiator; all mutation goes
/// through `dispatch` for outside events and `handle_action` for user intents.
pub struct SessionController {
    connection: ConnectionManager,
    state: SessionState,
    typing: TypingDebouncer,
    viewport: ViewportNegotiator,
    host: HostFrameBox,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: Option<mpsc::UnboundedReceiver<Event>>,
}

impl SessionController {
    pub fn new(
        connection: ConnectionManager,
        host: HostFrameBox,
        options: SessionOptions,
    ) -> SessionController {
        let state = SessionState::new(
            &options.greeting,
            options.quick_replies,
            &options.assistant_id,
        );
        let viewport = ViewportNegotiator::new(&options.host_origin, options.mobile_breakpoint);
        let (snapshot_tx, _) = watch::channel(state.snapshot(viewport.is_mobile()));
        let (events_tx, events_rx) = mpsc::unbounded_channel::<Event>();

        return SessionController {
            connection,
            state,
            typing: TypingDebouncer::new(options.typing_timeout),
            viewport,
            host,
            snapshot_tx,
            events_tx,
            events_rx: Some(events_rx),
        };
    }

    /// One receiver per consumer. Dropping it ends the subscription.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        return self.snapshot_tx.subscribe();
    }

    /// Sender for events originating outside the transport, such as messages
    /// from the embedding page.
    pub fn events(&self) -> mpsc::UnboundedSender<Event> {
        return self.events_tx.clone();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        return self.state.snapshot(self.viewport.is_mobile());
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }

    async fn emit(&self, event: ClientEvent) {
        let name = event.name();
        if let Err(err) = self.connection.emit(event).await {
            tracing::warn!(event = name, error = ?err, "failed to emit event");
        }
    }

    pub async fn mount(&mut self) -> Result<()> {
        if let Err(err) = self.viewport.start(&self.host) {
            tracing::debug!(error = ?err, "viewport request failed");
        }

        if let Err(err) = self.connection.connect(self.events_tx.clone()).await {
            tracing::error!(error = ?err, "failed to start connection");
            self.state.handle_connect_error(CONNECT_ERROR);
        }

        self.publish();
        return Ok(());
    }

    pub async fn dispatch(&mut self, event: Event) -> Result<()> {
        match event {
            Event::TransportOpen(session_id) => {
                if let Err(err) = self.connection.handle_open(&session_id).await {
                    tracing::warn!(error = ?err, "failed to start chat");
                }
                self.state.handle_connect_success();
            }
            Event::TransportConnectError(reason) => {
                tracing::warn!(reason, "connection error");
                self.connection.handle_close();
                self.state.handle_connect_error(CONNECT_ERROR);
            }
            Event::TransportDisconnect(reason) => {
                tracing::warn!(reason, "disconnected");
                self.connection.handle_close();
                self.state.handle_disconnect();
            }
            Event::TransportReconnectFailed() => {
                tracing::error!("reconnection attempts exhausted");
                self.connection.handle_close();
                self.state.handle_connect_error(CONNECT_ERROR);
            }
            Event::Remote(ServerEvent::Response(text)) => {
                self.state.handle_remote_response(&text);
            }
            Event::Remote(ServerEvent::Typing(sender)) => {
                self.state.handle_remote_typing(&sender);
            }
            Event::Remote(ServerEvent::StopTyping(sender)) => {
                self.state.handle_remote_stop_typing(&sender);
            }
            Event::Remote(ServerEvent::Error(message)) => {
                tracing::warn!(error_message = ?message, "backend reported an error");
                self.state.handle_remote_error(message);
            }
            Event::FrameMessage(origin, data) => {
                self.viewport.handle_frame_message(&origin, &data);
            }
        }

        self.publish();
        return Ok(());
    }

    /// Applies a user intent. Returns true when the user asked to quit.
    pub async fn handle_action(&mut self, action: Action) -> Result<bool> {
        let live = self.connection.is_live();

        match action {
            Action::Send(text) => {
                if let Some(message) = self.state.handle_user_send(&text, live) {
                    self.emit(ClientEvent::Message(message)).await;
                }
            }
            Action::QuickReply(idx) => {
                if let Some(message) = self.state.handle_quick_reply(idx, live) {
                    self.emit(ClientEvent::Message(message)).await;
                }
            }
            Action::Keystroke() => {
                if self.typing.keystroke(Instant::now()) {
                    self.emit(ClientEvent::Typing).await;
                }
                return Ok(false);
            }
            Action::Minimize() => {
                self.state.minimize();
            }
            // The connection and its backend session id are kept, so no new
            // `startChat` is sent after restoring an ended session.
            Action::Restore() => {
                if self.state.session_ended {
                    self.connection.resume();
                }
                self.state.restore();
            }
            Action::EndSession() => {
                if !self.state.session_ended {
                    self.connection.end_session().await;
                }
                self.state.end_session();
            }
            Action::ClearChat() => {
                self.connection.delete_session().await;
                self.state.clear_chat();
            }
            Action::DismissError() => {
                self.state.dismiss_error();
            }
            Action::Resize(width) => {
                self.viewport.handle_resize(width);
            }
            Action::Quit() => {
                return Ok(true);
            }
        }

        self.publish();
        return Ok(false);
    }

    pub async fn handle_typing_deadline(&mut self, now: Instant) {
        if self.typing.poll(now) {
            self.emit(ClientEvent::StopTyping).await;
        }
    }

    /// Cancels the typing timer, deletes the backend session unless it was
    /// ended explicitly, then closes the connection. Idempotent.
    pub async fn teardown(&mut self) {
        self.typing.cancel();
        self.connection.teardown().await;
    }

    /// Runs the event loop until the user quits, the action channel closes or
    /// `shutdown` resolves. Teardown runs on every exit path.
    pub async fn run<F>(
        mut self,
        actions: &mut mpsc::UnboundedReceiver<Action>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let res = self.run_loop(actions, shutdown).await;
        if let Err(err) = &res {
            tracing::error!(error = ?err, "session loop failed");
        }

        self.teardown().await;
        return res;
    }

    async fn run_loop<F>(
        &mut self,
        actions: &mut mpsc::UnboundedReceiver<Action>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let Some(mut events_rx) = self.events_rx.take() else {
            return Ok(());
        };

        self.mount().await?;
        tokio::pin!(shutdown);

        loop {
            let deadline = self.typing.deadline();

            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    return Ok(());
                }
                Some(event) = events_rx.recv() => {
                    self.dispatch(event).await?;
                }
                action = actions.recv() => {
                    let Some(action) = action else {
                        return Ok(());
                    };
                    if self.handle_action(action).await? {
                        return Ok(());
                    }
                }
                _ = typing_deadline(deadline) => {
                    self.handle_typing_deadline(Instant::now()).await;
                }
            }
        }
    }
}
