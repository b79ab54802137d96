#[cfg(test)]
#[path = "standalone_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::FrameMessage;
use crate::domain::models::HostFrame;

/// Host for a widget running on its own, with no parent page to negotiate
/// with. Viewport decisions fall back to the widget's own width.
#[derive(Default)]
pub struct StandaloneHost {}

impl HostFrame for StandaloneHost {
    fn is_nested(&self) -> bool {
        return false;
    }

    fn post_to_parent(&self, message: &FrameMessage, target_origin: &str) -> Result<()> {
        tracing::debug!(?message, target_origin, "no parent frame, dropping message");
        return Ok(());
    }
}
