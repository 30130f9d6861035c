//! Error taxonomy for the frame codec and packet registry.

use thiserror::Error;

/// Maximum size of an entire packet frame (length prefix's domain).
pub const MAX_PACKET_SIZE: usize = 2_097_152;
/// Maximum size of a packet's decompressed body.
pub const MAX_PACKET_DATA_SIZE: usize = 8_388_608;

/// Fatal framing failures: malformed varints, truncated reads, bad deflate
/// streams. Any of these terminates the connection.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("packet length {0} exceeds the maximum frame size")]
    TooLong(usize),
    #[error("declared packet length is out of bounds")]
    OutOfBounds,
    #[error("malformed length prefix: {0}")]
    MalformedLength(String),
    #[error("malformed value in packet body: {0}")]
    MalformedValue(String),
    #[error("failed to decompress packet body: {0}")]
    DecompressionFailed(String),
    #[error("failed to compress packet body: {0}")]
    CompressionFailed(String),
    #[error("packet body was below the compression threshold but not sent uncompressed")]
    NotCompressed,
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable protocol-shape violations: a packet arrived that isn't legal
/// in the current state, or a login step's contract was violated. The caller
/// gets one chance to send a disconnect message before closing.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("packet not registered for {0:?}/{1:?}")]
    WrongProtocolOrDirection(crate::ConnectionProtocol, PacketDirection),
    #[error("unexpected packet during login: {0}")]
    UnexpectedLoginPacket(&'static str),
    #[error("verify token did not match the one issued")]
    VerifyTokenMismatch,
    #[error("shared secret had length {0}, expected 16")]
    BadSharedSecretLength(usize),
    #[error("client protocol version {client}, server expects {server}")]
    VersionMismatch { client: i32, server: i32 },
}

/// Direction a packet travels, used only for error messages and dispatch
/// tables — `ToServer` is inbound, `ToClient` is outbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketDirection {
    ToServer,
    ToClient,
}

/// Combines the above into the single error type the connection layer's
/// packet traits surface.
#[derive(Debug, Error)]
pub enum PacketError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("{0}")]
    SendFailed(String),
}

impl From<std::io::Error> for PacketError {
    fn from(value: std::io::Error) -> Self {
        Self::Frame(FrameError::Io(value))
    }
}
