//! The error type returned across the embedding API's connection surface.

use strata_protocol::PacketError;
use thiserror::Error;

/// Everything `Connection::write_packet`/`read_packet` can fail with.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("packet is not registered for the connection's current state/direction")]
    WrongProtocolOrDirection,
    #[error("connection is closed")]
    Closed,
    #[error(transparent)]
    Packet(#[from] PacketError),
}
