use anyhow::Result;

use super::FrameMessage;

/// The page (or process) the widget is embedded in.
pub trait HostFrame {
    /// True when running inside a nested browsing context with a parent to
    /// talk to.
    fn is_nested(&self) -> bool;

    /// Posts a message to the parent context, restricted to `target_origin`.
    fn post_to_parent(&self, message: &FrameMessage, target_origin: &str) -> Result<()>;
}

pub type HostFrameBox = Box<dyn HostFrame + Send + Sync>;
