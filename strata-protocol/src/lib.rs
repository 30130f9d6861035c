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

//! The four-state connection protocol: frame codec (compression + AES-CFB8
//! stream encryption), the packet registry for Handshaking/Status/Login/Play,
//! and the traits tying inbound and outbound packets to it.

pub mod cipher;
pub mod connection_state;
pub mod encoded_packet;
pub mod errors;
pub mod packet;
pub mod packet_reader;
pub mod packet_writer;
pub mod packets;

pub use connection_state::ConnectionProtocol;
pub use encoded_packet::{CompressionInfo, EncodedPacket};
pub use errors::PacketError;
pub use packet::{ClientPacket, RawPacket, ServerPacket};
pub use packet_reader::TCPNetworkDecoder;
pub use packet_writer::TCPNetworkEncoder;
