use super::help_text;
use super::SlashCommand;
use crate::domain::models::Action;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_regular_text() {
    let text = "I want to design a kitchen";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_is_quit() {
    for text in ["/q", "/quit", "/exit"] {
        let cmd = SlashCommand::parse(text).unwrap();
        assert!(cmd.is_quit());
        assert!(cmd.action().is_none());
    }
}
#[test]
fn it_is_not_is_quit() {
    let cmd = SlashCommand::parse("/min").unwrap();
    assert!(!cmd.is_quit());
}

#[test]
fn it_is_help() {
    let cmd = SlashCommand::parse("/help").unwrap();
    assert!(cmd.is_help());
    assert!(cmd.action().is_none());
}

#[test]
fn it_maps_minimize() {
    let cmd = SlashCommand::parse("/minimize").unwrap();
    assert_eq!(cmd.action(), Some(Action::Minimize()));
    let cmd = SlashCommand::parse("/min").unwrap();
    assert_eq!(cmd.action(), Some(Action::Minimize()));
}

#[test]
fn it_maps_restore() {
    let cmd = SlashCommand::parse("/r").unwrap();
    assert_eq!(cmd.action(), Some(Action::Restore()));
}

#[test]
fn it_maps_end() {
    let cmd = SlashCommand::parse("/end").unwrap();
    assert_eq!(cmd.action(), Some(Action::EndSession()));
}

#[test]
fn it_maps_clear() {
    let cmd = SlashCommand::parse("/clear").unwrap();
    assert_eq!(cmd.action(), Some(Action::ClearChat()));
}

#[test]
fn it_maps_dismiss() {
    let cmd = SlashCommand::parse("/d").unwrap();
    assert_eq!(cmd.action(), Some(Action::DismissError()));
}

#[test]
fn it_maps_quick_replies() {
    let cmd = SlashCommand::parse("/1").unwrap();
    assert_eq!(cmd.quick_reply_index(), Some(0));
    assert_eq!(cmd.action(), Some(Action::QuickReply(0)));

    let cmd = SlashCommand::parse("/3").unwrap();
    assert_eq!(cmd.action(), Some(Action::QuickReply(2)));
}

#[test]
fn it_ignores_zero_quick_reply() {
    assert!(SlashCommand::parse("/0").is_none());
}

#[test]
fn it_documents_every_command_in_help() {
    for line in help_text().lines().filter(|line| return line.starts_with("- /")) {
        let command = line
            .trim_start_matches("- ")
            .split(' ')
            .next()
            .unwrap()
            .trim_end_matches(',');
        assert!(
            SlashCommand::parse(command).is_some(),
            "{command} is not a command"
        );
    }
}
