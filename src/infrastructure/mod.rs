pub mod hosts;
pub mod sessions_api;
pub mod transports;
