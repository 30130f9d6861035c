//! The single packet that starts every connection.

use std::io::{Read, Result};

use strata_utils::codec::VarInt;
use strata_utils::serial::{ReadFrom, read_string};

use crate::packet::ServerPacket;

/// The client's declared protocol version, the address it dialed, and
/// whether it intends to ping the server or log in.
#[derive(Debug, Clone)]
pub struct Handshake {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: NextState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    Status,
    Login,
}

impl ReadFrom for Handshake {
    fn read(data: &mut impl Read) -> Result<Self> {
        let protocol_version = VarInt::read(data)?.0;
        let server_address = read_string(data)?;
        let server_port = u16::read(data)?;
        let next_state = match VarInt::read(data)?.0 {
            1 => NextState::Status,
            _ => NextState::Login,
        };
        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }
}

impl ServerPacket for Handshake {}
