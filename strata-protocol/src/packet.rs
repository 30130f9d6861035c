//! The inbound/outbound packet contract every concrete packet type in
//! [`crate::packets`] implements.

use std::io::{Cursor, Write};

use strata_utils::{codec::VarInt, serial::ReadFrom, serial::WriteTo};

use crate::connection_state::ConnectionProtocol;
use crate::errors::PacketError;

/// A packet consumed before its ID and body have been matched against a
/// concrete type — what the frame codec hands the dispatcher.
#[derive(Debug)]
pub struct RawPacket {
    pub id: i32,
    pub payload: Vec<u8>,
}

/// An inbound packet. Reading never needs the connection state since the
/// dispatcher already picked the right type for the current state.
pub trait ServerPacket: ReadFrom {
    fn read_packet(data: &mut Cursor<&[u8]>) -> Result<Self, PacketError> {
        Self::read(data).map_err(|err| PacketError::Frame(err.into()))
    }
}

/// An outbound packet. Its wire ID can depend on which state the connection
/// is in, since the same struct is sometimes reused across states.
pub trait ClientPacket: WriteTo {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32>;

    fn write_packet(&self, writer: &mut impl Write, protocol: ConnectionProtocol) -> Result<(), PacketError> {
        let id = self
            .get_id(protocol)
            .ok_or(crate::errors::ProtocolError::WrongProtocolOrDirection(
                protocol,
                crate::errors::PacketDirection::ToClient,
            ))?;
        VarInt(id).write(writer).map_err(|err| PacketError::Frame(err.into()))?;
        self.write(writer).map_err(|err| PacketError::Frame(err.into()))
    }
}
