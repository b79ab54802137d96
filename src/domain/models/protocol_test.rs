use anyhow::Result;
use serde_json::json;

use super::ClientEvent;
use super::ServerEvent;

#[test]
fn it_names_client_events() {
    assert_eq!(ClientEvent::StartChat.name(), "startChat");
    assert_eq!(ClientEvent::Message("hi".to_string()).name(), "message");
    assert_eq!(ClientEvent::Typing.name(), "typing");
    assert_eq!(ClientEvent::StopTyping.name(), "stopTyping");
}

#[test]
fn it_only_sends_payloads_for_messages() -> Result<()> {
    assert!(ClientEvent::StartChat.payload()?.is_none());
    assert!(ClientEvent::Typing.payload()?.is_none());
    assert!(ClientEvent::StopTyping.payload()?.is_none());

    let payload = ClientEvent::Message("hello".to_string()).payload()?;
    assert_eq!(payload, Some(json!({ "message": "hello" })));
    return Ok(());
}

#[test]
fn it_parses_responses() -> Result<()> {
    let res = ServerEvent::parse("response", Some(json!({ "message": "hi" })))?;
    assert_eq!(res, Some(ServerEvent::Response("hi".to_string())));
    return Ok(());
}

#[test]
fn it_parses_typing_with_sender() -> Result<()> {
    let res = ServerEvent::parse("typing", Some(json!({ "sessionId": "assistant" })))?;
    assert_eq!(res, Some(ServerEvent::Typing("assistant".to_string())));

    let res = ServerEvent::parse("stopTyping", Some(json!({ "sessionId": "abc" })))?;
    assert_eq!(res, Some(ServerEvent::StopTyping("abc".to_string())));
    return Ok(());
}

#[test]
fn it_parses_errors_with_and_without_message() -> Result<()> {
    let res = ServerEvent::parse("error", Some(json!({ "message": "boom" })))?;
    assert_eq!(res, Some(ServerEvent::Error(Some("boom".to_string()))));

    let res = ServerEvent::parse("error", Some(json!({})))?;
    assert_eq!(res, Some(ServerEvent::Error(None)));

    let res = ServerEvent::parse("error", None)?;
    assert_eq!(res, Some(ServerEvent::Error(None)));

    let res = ServerEvent::parse("error", Some(json!("plain text")))?;
    assert_eq!(res, Some(ServerEvent::Error(None)));
    return Ok(());
}

#[test]
fn it_ignores_unknown_events() -> Result<()> {
    let res = ServerEvent::parse("somethingElse", Some(json!({ "a": 1 })))?;
    assert!(res.is_none());
    return Ok(());
}

#[test]
fn it_fails_on_malformed_known_events() {
    assert!(ServerEvent::parse("response", Some(json!({ "text": "hi" }))).is_err());
    assert!(ServerEvent::parse("typing", None).is_err());
}
