use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;

use super::ViewportNegotiator;
use crate::domain::models::FrameMessage;
use crate::domain::models::HostFrame;
use crate::domain::models::HostFrameBox;

const ORIGIN: &str = "https://shop.example.com";

struct RecordingHost {
    nested: bool,
    posted: Arc<Mutex<Vec<(FrameMessage, String)>>>,
}

impl HostFrame for RecordingHost {
    fn is_nested(&self) -> bool {
        return self.nested;
    }

    fn post_to_parent(&self, message: &FrameMessage, target_origin: &str) -> Result<()> {
        self.posted
            .lock()
            .unwrap()
            .push((message.clone(), target_origin.to_string()));
        return Ok(());
    }
}

fn host(nested: bool) -> (HostFrameBox, Arc<Mutex<Vec<(FrameMessage, String)>>>) {
    let posted = Arc::new(Mutex::new(vec![]));
    let host = RecordingHost {
        nested,
        posted: posted.clone(),
    };
    return (Box::new(host), posted);
}

#[test]
fn it_requests_viewport_info_when_nested() -> Result<()> {
    let (host, posted) = host(true);
    ViewportNegotiator::new(ORIGIN, 600).start(&host)?;

    let posted = posted.lock().unwrap();
    assert_eq!(
        *posted,
        vec![(FrameMessage::RequestViewportInfo, ORIGIN.to_string())]
    );
    return Ok(());
}

#[test]
fn it_does_not_request_when_top_level() -> Result<()> {
    let (host, posted) = host(false);
    ViewportNegotiator::new(ORIGIN, 600).start(&host)?;

    assert!(posted.lock().unwrap().is_empty());
    return Ok(());
}

#[test]
fn it_falls_back_to_width() {
    let mut viewport = ViewportNegotiator::new(ORIGIN, 600);
    assert!(!viewport.is_mobile());

    viewport.handle_resize(600);
    assert!(viewport.is_mobile());

    viewport.handle_resize(601);
    assert!(!viewport.is_mobile());

    viewport.handle_resize(320);
    assert!(viewport.is_mobile());
}

#[test]
fn it_prefers_host_classification_forever() {
    let mut viewport = ViewportNegotiator::new(ORIGIN, 600);
    viewport.handle_resize(320);

    let accepted =
        viewport.handle_frame_message(ORIGIN, r#"{"type":"VIEWPORT_INFO","isMobile":false}"#);
    assert!(accepted);
    assert!(!viewport.is_mobile());

    viewport.handle_resize(200);
    assert!(!viewport.is_mobile());
}

#[test]
fn it_ignores_other_origins() {
    let mut viewport = ViewportNegotiator::new(ORIGIN, 600);
    viewport.handle_resize(1024);

    let accepted = viewport.handle_frame_message(
        "https://evil.example.com",
        r#"{"type":"VIEWPORT_INFO","isMobile":true}"#,
    );
    assert!(!accepted);
    assert!(!viewport.is_mobile());
}

#[test]
fn it_ignores_malformed_messages() {
    let mut viewport = ViewportNegotiator::new(ORIGIN, 600);
    viewport.handle_resize(400);

    assert!(!viewport.handle_frame_message(ORIGIN, "not json"));
    assert!(!viewport.handle_frame_message(ORIGIN, r#"{"type":"REQUEST_VIEWPORT_INFO"}"#));
    assert!(viewport.is_mobile());

    viewport.handle_resize(800);
    assert!(!viewport.is_mobile());
}
