//! The packet-ID namespace a connection is currently speaking.

/// Describes which set of packets a connection understands right now.
///
/// A connection always starts in [`Self::Handshaking`]; the first inbound
/// packet picks either [`Self::Status`] (server-list ping) or [`Self::Login`]
/// (the authentication handshake), the latter of which ends by switching to
/// [`Self::Play`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ConnectionProtocol {
    /// Initial state: the client announces its protocol version and intent.
    Handshaking,
    /// Server-list ping: status request/response, then a ping/pong.
    Status,
    /// Authentication: encryption, compression, and the Mojang session check.
    Login,
    /// The main in-game protocol.
    Play,
}
