#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::ClientEvent;
use crate::domain::models::Event;
use crate::domain::models::SessionsApiBox;
use crate::domain::models::TransportBox;

/// Owns the one connection a widget may have, and the backend session that
/// rides on it.
pub struct ConnectionManager {
    transport: TransportBox,
    sessions_api: SessionsApiBox,
    session_id: Option<String>,
    connected: bool,
    open: bool,
    closed: bool,
    ended: bool,
}

impl ConnectionManager {
    pub fn new(transport: TransportBox, sessions_api: SessionsApiBox) -> ConnectionManager {
        return ConnectionManager {
            transport,
            sessions_api,
            session_id: None,
            connected: false,
            open: false,
            closed: false,
            ended: false,
        };
    }

    pub fn session_id(&self) -> Option<&str> {
        return self.session_id.as_deref();
    }

    /// True while a backend session is open and `startChat` has been queued
    /// for it. Cleared by a drop or a failed connect, and for good by
    /// `teardown`.
    pub fn is_live(&self) -> bool {
        return self.connected && self.open && !self.closed;
    }

    pub async fn connect(&mut self, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
        if self.connected || self.closed {
            return Ok(());
        }

        self.transport.connect(tx).await?;
        self.connected = true;

        return Ok(());
    }

    /// Called for every transport open. Each backend-assigned id is a new
    /// connection lifetime and gets exactly one `startChat`.
    pub async fn handle_open(&mut self, session_id: &str) -> Result<()> {
        if self.session_id.as_deref() == Some(session_id) {
            self.open = true;
            return Ok(());
        }

        tracing::info!(session_id, "connected to assistant backend");
        self.session_id = Some(session_id.to_string());
        self.transport.emit(ClientEvent::StartChat).await?;
        self.open = true;

        return Ok(());
    }

    /// The transport lost its session or failed to open one. Nothing is
    /// emitted until the next `handle_open`.
    pub fn handle_close(&mut self) {
        self.open = false;
    }

    pub async fn emit(&self, event: ClientEvent) -> Result<()> {
        if !self.is_live() {
            return Ok(());
        }

        return self.transport.emit(event).await;
    }

    /// Best-effort deletion of the backend session. Failures are logged and
    /// never returned.
    pub async fn delete_session(&self) {
        let Some(session_id) = self.session_id.as_deref() else {
            return;
        };

        if let Err(err) = self.sessions_api.delete_session(session_id).await {
            tracing::warn!(session_id, error = ?err, "failed to delete session");
        }
    }

    /// Explicit end of session by the user. The backend session is deleted now
    /// so teardown doesn't repeat it.
    pub async fn end_session(&mut self) {
        self.delete_session().await;
        self.ended = true;
    }

    /// The conversation continues after an ended session was restored.
    pub fn resume(&mut self) {
        self.ended = false;
    }

    /// Deletes the session unless it was explicitly ended, then closes the
    /// transport. Safe to call more than once.
    pub async fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if !self.ended {
            self.delete_session().await;
        }

        if let Err(err) = self.transport.close().await {
            tracing::warn!(error = ?err, "failed to close transport");
        }
    }
}
