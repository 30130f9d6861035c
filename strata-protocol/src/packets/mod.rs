//! Concrete packet types for each of the four connection states.

pub mod handshake;
pub mod login;
pub mod play;
pub mod status;
