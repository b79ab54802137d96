use test_utils::long_reply_fixture;

use super::Message;
use super::Role;

#[test]
fn it_executes_new() {
    let msg = Message::new(Role::Assistant, "Hi there!");
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.role.to_string(), "assistant");
    assert_eq!(msg.content, "Hi there!".to_string());
    assert!(!msg.is_user());
}

#[test]
fn it_executes_new_replacing_tabs() {
    let msg = Message::new(Role::User, "\t\tHi there!");
    assert_eq!(msg.content, "    Hi there!".to_string());
    assert!(msg.is_user());
}

#[test]
fn it_serializes_role_lowercase() -> anyhow::Result<()> {
    let msg = Message::new(Role::User, "hello");
    let json = serde_json::to_string(&msg)?;
    insta::assert_snapshot!(json, @r###"{"role":"user","content":"hello"}"###);
    return Ok(());
}

#[test]
fn it_executes_as_string_lines() {
    let msg = Message::new(
        Role::Assistant,
        "Hello there, this is a longer line that needs wrapping.\n\nSecond paragraph.",
    );
    let lines = msg.as_string_lines(20);
    assert_eq!(
        lines,
        vec![
            "Hello there, this".to_string(),
            "is a longer line".to_string(),
            "that needs".to_string(),
            "wrapping.".to_string(),
            " ".to_string(),
            "Second paragraph.".to_string(),
        ]
    );
}

#[test]
fn it_keeps_long_words_on_their_own_line() {
    let msg = Message::new(Role::User, "supercalifragilistic ok");
    let lines = msg.as_string_lines(5);
    assert_eq!(
        lines,
        vec!["supercalifragilistic".to_string(), "ok".to_string()]
    );
}

#[test]
fn it_wraps_long_replies_within_width() {
    let msg = Message::new(Role::Assistant, long_reply_fixture());
    let lines = msg.as_string_lines(40);

    assert!(lines.iter().all(|line| return line.chars().count() <= 40));
    assert_eq!(lines.iter().filter(|line| return *line == " ").count(), 2);
    assert_eq!(
        lines[0],
        "Thanks for reaching out! Here is what".to_string()
    );
}
