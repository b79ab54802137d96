#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

use super::Action;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        let prefix = args[0].to_string();
        args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_minimize()
            || cmd.is_restore()
            || cmd.is_end()
            || cmd.is_clear()
            || cmd.is_dismiss()
            || cmd.quick_reply_index().is_some()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_minimize(&self) -> bool {
        return ["/min", "/minimize"].contains(&self.command.as_str());
    }

    pub fn is_restore(&self) -> bool {
        return ["/r", "/restore"].contains(&self.command.as_str());
    }

    pub fn is_end(&self) -> bool {
        return ["/end"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/c", "/clear"].contains(&self.command.as_str());
    }

    pub fn is_dismiss(&self) -> bool {
        return ["/d", "/dismiss"].contains(&self.command.as_str());
    }

    /// `/1`, `/2`, ... select a quick reply. Returns the zero based index.
    pub fn quick_reply_index(&self) -> Option<usize> {
        let number = self.command.strip_prefix('/')?.parse::<usize>().ok()?;
        if number == 0 {
            return None;
        }

        return Some(number - 1);
    }

    /// Maps commands that change the session to the matching intent. Quit and
    /// help are handled by the presentation itself.
    pub fn action(&self) -> Option<Action> {
        if self.is_minimize() {
            return Some(Action::Minimize());
        }
        if self.is_restore() {
            return Some(Action::Restore());
        }
        if self.is_end() {
            return Some(Action::EndSession());
        }
        if self.is_clear() {
            return Some(Action::ClearChat());
        }
        if self.is_dismiss() {
            return Some(Action::DismissError());
        }
        if let Some(idx) = self.quick_reply_index() {
            return Some(Action::QuickReply(idx));
        }

        return None;
    }
}

pub fn help_text() -> &'static str {
    return r#"
COMMANDS:
- /minimize (/min) - Minimize the chat widget.
- /restore (/r) - Reopen a minimized or ended chat.
- /end - End the session and minimize the widget.
- /clear (/c) - Delete the session and start over from the greeting.
- /dismiss (/d) - Dismiss the current error.
- /1, /2, ... - Send one of the suggested quick replies.
- /help (/h) - Show this help.
- /quit /exit (/q) - Exit the chat.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- ESC - Dismiss the current error
- CTRL+C - Exit the chat
"#
    .trim();
}
