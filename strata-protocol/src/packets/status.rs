//! The server-list ping exchange: two inbound packets, two outbound.

use std::io::{Read, Result, Write};

use strata_utils::serial::{ReadFrom, WriteTo, write_string};

use crate::connection_state::ConnectionProtocol;
use crate::packet::{ClientPacket, ServerPacket};

#[derive(Debug, Clone, Copy)]
pub struct StatusRequest;

impl ReadFrom for StatusRequest {
    fn read(_data: &mut impl Read) -> Result<Self> {
        Ok(Self)
    }
}
impl ServerPacket for StatusRequest {}

#[derive(Debug, Clone, Copy)]
pub struct StatusPing {
    pub payload: i64,
}

impl ReadFrom for StatusPing {
    fn read(data: &mut impl Read) -> Result<Self> {
        Ok(Self {
            payload: i64::read(data)?,
        })
    }
}
impl ServerPacket for StatusPing {}

/// Carries the pre-serialized server-status JSON (MOTD, player sample,
/// version) the listener's status provider produced.
#[derive(Debug, Clone)]
pub struct StatusResponse {
    pub json: String,
}

impl WriteTo for StatusResponse {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        write_string(&self.json, writer)
    }
}
impl ClientPacket for StatusResponse {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Status).then_some(0x00)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StatusPong {
    pub payload: i64,
}

impl WriteTo for StatusPong {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.payload.write(writer)
    }
}
impl ClientPacket for StatusPong {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Status).then_some(0x01)
    }
}
