mod connection;
mod controller;
pub mod events;
#[cfg(test)]
pub mod fakes;
mod scroll;
mod session_state;
mod transcript;
mod typing;
mod viewport;

pub use connection::*;
pub use controller::*;
pub use scroll::*;
pub use session_state::*;
pub use transcript::*;
pub use typing::*;
pub use viewport::*;
