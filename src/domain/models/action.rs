/// User intents flowing from the presentation into the session controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ClearChat(),
    DismissError(),
    EndSession(),
    Keystroke(),
    Minimize(),
    QuickReply(usize),
    Quit(),
    Resize(u32),
    Restore(),
    Send(String),
}
