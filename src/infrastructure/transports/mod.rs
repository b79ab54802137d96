mod packet;
mod socketio;

pub use socketio::*;
