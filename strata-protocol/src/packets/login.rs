//! Authentication: encryption challenge, the Mojang session check, and
//! compression activation.

use std::io::{Read, Result, Write};

use strata_utils::serial::{ReadFrom, WriteTo, read_byte_vec, read_string, write_byte_slice, write_string};
use strata_utils::text::TextComponent;
use uuid::Uuid;

use crate::connection_state::ConnectionProtocol;
use crate::packet::{ClientPacket, ServerPacket};

#[derive(Debug, Clone)]
pub struct LoginStart {
    pub username: String,
}

impl ReadFrom for LoginStart {
    fn read(data: &mut impl Read) -> Result<Self> {
        Ok(Self {
            username: read_string(data)?,
        })
    }
}
impl ServerPacket for LoginStart {}

#[derive(Debug, Clone)]
pub struct EncryptionResponse {
    pub encrypted_shared_secret: Vec<u8>,
    pub encrypted_verify_token: Vec<u8>,
}

impl ReadFrom for EncryptionResponse {
    fn read(data: &mut impl Read) -> Result<Self> {
        Ok(Self {
            encrypted_shared_secret: read_byte_vec(data)?,
            encrypted_verify_token: read_byte_vec(data)?,
        })
    }
}
impl ServerPacket for EncryptionResponse {}

#[derive(Debug, Clone)]
pub struct LoginDisconnect {
    pub reason: TextComponent,
}

impl WriteTo for LoginDisconnect {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.reason.write(writer)
    }
}
impl ClientPacket for LoginDisconnect {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Login).then_some(0x00)
    }
}

/// The RSA challenge: an (empty, per vanilla) server ID, the server's DER
/// `SubjectPublicKeyInfo`, and a random verify token the client must echo.
#[derive(Debug, Clone)]
pub struct EncryptionRequest {
    pub server_id: String,
    pub public_key_der: Vec<u8>,
    pub verify_token: Vec<u8>,
}

impl WriteTo for EncryptionRequest {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        write_string(&self.server_id, writer)?;
        write_byte_slice(&self.public_key_der, writer)?;
        write_byte_slice(&self.verify_token, writer)
    }
}
impl ClientPacket for EncryptionRequest {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Login).then_some(0x01)
    }
}

#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub uuid: Uuid,
    pub username: String,
}

impl WriteTo for LoginSuccess {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.uuid.write(writer)?;
        write_string(&self.username, writer)
    }
}
impl ClientPacket for LoginSuccess {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Login).then_some(0x02)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetCompression {
    pub threshold: i32,
}

impl WriteTo for SetCompression {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        strata_utils::codec::VarInt(self.threshold).write(writer)
    }
}
impl ClientPacket for SetCompression {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Login).then_some(0x03)
    }
}
