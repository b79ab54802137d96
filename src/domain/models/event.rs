use super::ServerEvent;

/// Everything that reaches the session controller from outside the user's
/// hands: the socket transport and the embedding host page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Inbound cross-frame message as `(origin, data)`.
    FrameMessage(String, String),
    Remote(ServerEvent),
    TransportConnectError(String),
    TransportDisconnect(String),
    /// Socket connected; carries the backend-assigned session id.
    TransportOpen(String),
    TransportReconnectFailed(),
}
