mod action;
mod event;
mod frame;
mod host;
mod loading;
mod message;
mod protocol;
mod role;
mod slash_commands;
mod snapshot;
mod textarea;
mod transport;

pub use action::*;
pub use event::*;
pub use frame::*;
pub use host::*;
pub use loading::*;
pub use message::*;
pub use protocol::*;
pub use role::*;
pub use slash_commands::*;
pub use snapshot::*;
pub use textarea::*;
pub use transport::*;
