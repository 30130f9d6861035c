#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata
)]

//! A Minecraft Java Edition (protocol 757 / 1.18.0) server-side listener
//! and per-connection packet channel: handshake, status ping, login
//! (encryption, Mojang authentication, compression), and a framed Play
//! state. World generation, persistence, and game logic live in the
//! embedding application.

pub mod config;
pub mod connection;
pub mod error;
pub mod listener;
pub mod status;

pub use config::ServerConfig;
pub use connection::{Connection, PlayPacket};
pub use error::ConnectionError;
pub use listener::Listener;
pub use status::Status;
