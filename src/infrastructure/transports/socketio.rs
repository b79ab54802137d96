#[cfg(test)]
#[path = "socketio_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::SplitSink;
use futures::stream::SplitStream;
use futures::SinkExt;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::MaybeTlsStream;
use tokio_tungstenite::WebSocketStream;
use tokio_util::sync::CancellationToken;

use super::packet::Packet;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ClientEvent;
use crate::domain::models::Event;
use crate::domain::models::ServerEvent;
use crate::domain::models::Transport;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsSource = SplitStream<WsStream>;

const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Builds the engine.io WebSocket URL for a socket.io server endpoint.
pub fn websocket_url(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    let base = if let Some(rest) = endpoint.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = endpoint.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if endpoint.starts_with("wss://") || endpoint.starts_with("ws://") {
        endpoint.to_string()
    } else {
        bail!(format!("Unsupported endpoint scheme: {endpoint}"));
    };

    return Ok(format!("{base}/socket.io/?EIO=4&transport=websocket"));
}

enum SessionEnd {
    /// The client asked to close.
    Closed,
    /// An established connection dropped.
    Lost(String),
}

struct Worker {
    url: String,
    reconnection_attempts: u32,
    reconnection_delay: Duration,
    events: mpsc::UnboundedSender<Event>,
    outbound: mpsc::UnboundedReceiver<ClientEvent>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(mut self) {
        let mut attempts: u32 = 0;

        loop {
            match self.session().await {
                Ok(SessionEnd::Closed) => {
                    return;
                }
                Ok(SessionEnd::Lost(reason)) => {
                    tracing::warn!(reason, "socket connection lost");
                    attempts = 0;
                    if self.events.send(Event::TransportDisconnect(reason)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    tracing::warn!(error = ?err, attempts, "socket connection failed");
                    if self
                        .events
                        .send(Event::TransportConnectError(err.to_string()))
                        .is_err()
                    {
                        return;
                    }
                }
            }

            if attempts >= self.reconnection_attempts {
                let _ = self.events.send(Event::TransportReconnectFailed());
                return;
            }
            attempts += 1;

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    return;
                }
                _ = time::sleep(self.reconnection_delay) => {}
            }
        }
    }

    async fn session(&mut self) -> Result<SessionEnd> {
        let connected = tokio::select! {
            _ = self.cancel.cancelled() => {
                return Ok(SessionEnd::Closed);
            }
            res = tokio_tungstenite::connect_async(&self.url) => res,
        };
        let (ws_stream, _) = connected?;
        let (mut sink, mut source) = ws_stream.split();

        let handshake = match next_packet(&mut source).await? {
            Packet::Open(handshake) => handshake,
            packet => bail!(format!("Expected engine.io open packet, got {packet:?}")),
        };

        sink.send(WsMessage::Text(Packet::Connect(None).encode()?))
            .await?;

        let session_id = loop {
            match next_packet(&mut source).await? {
                Packet::Connect(sid) => break sid.unwrap_or_else(|| return handshake.sid.clone()),
                Packet::ConnectError(message) => {
                    bail!(message.unwrap_or_else(|| return "Connection refused".to_string()))
                }
                Packet::Ping => {
                    sink.send(WsMessage::Text(Packet::Pong.encode()?)).await?;
                }
                _ => {}
            }
        };

        tracing::debug!(session_id, "socket.io namespace connected");
        // Events queued for a previous session must not reach this one ahead
        // of its `startChat`.
        while let Ok(stale) = self.outbound.try_recv() {
            tracing::debug!(event = stale.name(), "dropping event queued before reconnect");
        }
        if self.events.send(Event::TransportOpen(session_id)).is_err() {
            return Ok(SessionEnd::Closed);
        }

        let heartbeat = Duration::from_millis(handshake.ping_interval + handshake.ping_timeout);
        match self.pump(&mut sink, &mut source, heartbeat).await {
            Ok(end) => return Ok(end),
            Err(err) => return Ok(SessionEnd::Lost(err.to_string())),
        }
    }

    async fn pump(
        &mut self,
        sink: &mut WsSink,
        source: &mut WsSource,
        heartbeat: Duration,
    ) -> Result<SessionEnd> {
        let mut last_seen = Instant::now();

        loop {
            let heartbeat_deadline = last_seen + heartbeat;

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    let _ = sink.send(WsMessage::Text(Packet::Disconnect.encode()?)).await;
                    let _ = sink.close().await;
                    return Ok(SessionEnd::Closed);
                }
                Some(event) = self.outbound.recv() => {
                    let packet = Packet::Event(event.name().to_string(), event.payload()?);
                    sink.send(WsMessage::Text(packet.encode()?)).await?;
                }
                _ = time::sleep_until(heartbeat_deadline), if !heartbeat.is_zero() => {
                    return Ok(SessionEnd::Lost("ping timeout".to_string()));
                }
                frame = source.next() => {
                    last_seen = Instant::now();
                    match frame {
                        Some(Ok(WsMessage::Text(text))) => {
                            if let Some(end) = self.handle_text(sink, &text).await? {
                                return Ok(end);
                            }
                        }
                        Some(Ok(WsMessage::Close(_))) | None => {
                            return Ok(SessionEnd::Lost("transport close".to_string()));
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            return Ok(SessionEnd::Lost(err.to_string()));
                        }
                    }
                }
            }
        }
    }

    async fn handle_text(&mut self, sink: &mut WsSink, text: &str) -> Result<Option<SessionEnd>> {
        let packet = match Packet::decode(text) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::debug!(error = ?err, "ignoring malformed packet");
                return Ok(None);
            }
        };

        match packet {
            Packet::Ping => {
                sink.send(WsMessage::Text(Packet::Pong.encode()?)).await?;
            }
            Packet::Event(name, payload) => match ServerEvent::parse(&name, payload) {
                Ok(Some(event)) => {
                    if self.events.send(Event::Remote(event)).is_err() {
                        return Ok(Some(SessionEnd::Closed));
                    }
                }
                Ok(None) => {
                    tracing::debug!(name, "ignoring unknown event");
                }
                Err(err) => {
                    tracing::debug!(name, error = ?err, "ignoring malformed event");
                }
            },
            Packet::Disconnect => {
                return Ok(Some(SessionEnd::Lost("io server disconnect".to_string())));
            }
            Packet::Close => {
                return Ok(Some(SessionEnd::Lost("transport close".to_string())));
            }
            _ => {}
        }

        return Ok(None);
    }
}

async fn next_packet(source: &mut WsSource) -> Result<Packet> {
    loop {
        match source.next().await {
            Some(Ok(WsMessage::Text(text))) => return Packet::decode(&text),
            Some(Ok(WsMessage::Close(_))) | None => {
                return Err(anyhow!("Connection closed during handshake"));
            }
            Some(Ok(_)) => continue,
            Some(Err(err)) => return Err(err.into()),
        }
    }
}

/// socket.io client over the engine.io WebSocket transport. Reconnects after
/// failures with a fixed delay, up to a bounded number of attempts.
pub struct SocketIo {
    endpoint: String,
    reconnection_attempts: u32,
    reconnection_delay: Duration,
    outbound: Option<mpsc::UnboundedSender<ClientEvent>>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

fn saturating_attempts(configured: u64) -> u32 {
    return u32::try_from(configured).unwrap_or(u32::MAX);
}

impl Default for SocketIo {
    fn default() -> SocketIo {
        return SocketIo::new(
            &Config::get(ConfigKey::Endpoint),
            saturating_attempts(Config::get_u64(ConfigKey::ReconnectionAttempts)),
            Duration::from_millis(Config::get_u64(ConfigKey::ReconnectionDelay)),
        );
    }
}

impl SocketIo {
    pub fn new(endpoint: &str, reconnection_attempts: u32, reconnection_delay: Duration) -> SocketIo {
        return SocketIo {
            endpoint: endpoint.to_string(),
            reconnection_attempts,
            reconnection_delay,
            outbound: None,
            cancel: CancellationToken::new(),
            worker: None,
        };
    }
}

#[async_trait]
impl Transport for SocketIo {
    #[allow(clippy::implicit_return)]
    async fn connect(&mut self, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
        if self.worker.is_some() || self.cancel.is_cancelled() {
            return Ok(());
        }

        let url = websocket_url(&self.endpoint)?;
        tracing::info!(url, "connecting");

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<ClientEvent>();
        self.outbound = Some(outbound_tx);

        let worker = Worker {
            url,
            reconnection_attempts: self.reconnection_attempts,
            reconnection_delay: self.reconnection_delay,
            events: tx,
            outbound: outbound_rx,
            cancel: self.cancel.clone(),
        };
        self.worker = Some(tokio::spawn(worker.run()));

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn emit(&self, event: ClientEvent) -> Result<()> {
        let Some(outbound) = &self.outbound else {
            bail!("Socket is not connected");
        };

        outbound.send(event)?;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn close(&mut self) -> Result<()> {
        self.cancel.cancel();
        self.outbound = None;

        if let Some(worker) = self.worker.take() {
            if time::timeout(CLOSE_TIMEOUT, worker).await.is_err() {
                tracing::warn!("socket worker did not stop in time");
            }
        }

        return Ok(());
    }
}
