#[cfg(test)]
#[path = "viewport_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::FrameMessage;
use crate::domain::models::HostFrameBox;

/// Decides whether the widget should lay itself out for mobile. The embedding
/// page is asked first; until (or unless) it answers, the viewport width is
/// compared against a breakpoint.
pub struct ViewportNegotiator {
    expected_origin: String,
    breakpoint: u32,
    width: Option<u32>,
    host_is_mobile: Option<bool>,
}

impl ViewportNegotiator {
    pub fn new(expected_origin: &str, breakpoint: u32) -> ViewportNegotiator {
        return ViewportNegotiator {
            expected_origin: expected_origin.to_string(),
            breakpoint,
            width: None,
            host_is_mobile: None,
        };
    }

    pub fn start(&self, host: &HostFrameBox) -> Result<()> {
        if !host.is_nested() {
            return Ok(());
        }

        tracing::debug!(origin = self.expected_origin, "requesting viewport info");
        host.post_to_parent(&FrameMessage::RequestViewportInfo, &self.expected_origin)?;

        return Ok(());
    }

    /// Returns true when the message was accepted.
    pub fn handle_frame_message(&mut self, origin: &str, data: &str) -> bool {
        if origin != self.expected_origin {
            tracing::debug!(origin, "ignoring frame message from unexpected origin");
            return false;
        }

        if let Some(FrameMessage::ViewportInfo { is_mobile }) = FrameMessage::parse(data) {
            self.host_is_mobile = Some(is_mobile);
            return true;
        }

        tracing::debug!("ignoring unrecognized frame message");
        return false;
    }

    pub fn handle_resize(&mut self, width: u32) {
        self.width = Some(width);
    }

    pub fn is_mobile(&self) -> bool {
        if let Some(is_mobile) = self.host_is_mobile {
            return is_mobile;
        }

        if let Some(width) = self.width {
            return width <= self.breakpoint;
        }

        return false;
    }
}
