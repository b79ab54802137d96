use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ClientEvent;
use super::Event;

#[async_trait]
pub trait Transport {
    /// Starts connecting in the background. Connection lifecycle and inbound
    /// server events are reported through `tx`. The transport owns its
    /// reconnection policy and keeps retrying up to its bound after failures.
    async fn connect(&mut self, tx: mpsc::UnboundedSender<Event>) -> Result<()>;

    /// Queues an event for the backend. Events emitted while the transport is
    /// reconnecting are delivered once the connection is back.
    async fn emit(&self, event: ClientEvent) -> Result<()>;

    /// Closes the connection and stops any reconnection attempts. Closing a
    /// closed transport is a no-op.
    async fn close(&mut self) -> Result<()>;
}

pub type TransportBox = Box<dyn Transport + Send + Sync>;

#[async_trait]
pub trait SessionsApi {
    /// Notifies the backend that the session identified by `session_id` is no
    /// longer needed.
    async fn delete_session(&self, session_id: &str) -> Result<()>;
}

pub type SessionsApiBox = Box<dyn SessionsApi + Send + Sync>;
