use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::ClientEvent;
use crate::domain::models::Event;
use crate::domain::models::FrameMessage;
use crate::domain::models::HostFrame;
use crate::domain::models::SessionsApi;
use crate::domain::models::Transport;

/// Everything the fakes were asked to do, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Calls {
    pub connects: usize,
    pub emitted: Vec<ClientEvent>,
    pub closes: usize,
    pub deleted: Vec<String>,
    pub posted: Vec<FrameMessage>,
    /// Interleaved log of deletes and closes to check teardown order.
    pub teardown_log: Vec<String>,
}

pub type SharedCalls = Arc<Mutex<Calls>>;

pub fn shared_calls() -> SharedCalls {
    return Arc::new(Mutex::new(Calls::default()));
}

pub struct FakeTransport {
    pub calls: SharedCalls,
}

#[async_trait]
impl Transport for FakeTransport {
    #[allow(clippy::implicit_return)]
    async fn connect(&mut self, _tx: mpsc::UnboundedSender<Event>) -> Result<()> {
        self.calls.lock().unwrap().connects += 1;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn emit(&self, event: ClientEvent) -> Result<()> {
        self.calls.lock().unwrap().emitted.push(event);
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn close(&mut self) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.closes += 1;
        calls.teardown_log.push("close".to_string());
        return Ok(());
    }
}

pub struct FakeSessionsApi {
    pub calls: SharedCalls,
    pub fail: bool,
}

#[async_trait]
impl SessionsApi for FakeSessionsApi {
    #[allow(clippy::implicit_return)]
    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.deleted.push(session_id.to_string());
        calls.teardown_log.push("delete".to_string());
        if self.fail {
            bail!("sessions api unavailable");
        }
        return Ok(());
    }
}

pub struct FakeHost {
    pub calls: SharedCalls,
    pub nested: bool,
}

impl HostFrame for FakeHost {
    fn is_nested(&self) -> bool {
        return self.nested;
    }

    fn post_to_parent(&self, message: &FrameMessage, _target_origin: &str) -> Result<()> {
        self.calls.lock().unwrap().posted.push(message.clone());
        return Ok(());
    }
}
