//! The in-game protocol surface this library actually frames: keep-alive,
//! disconnect, chunk delivery, the join handshake, and movement packets.

use std::io::{Read, Result, Write};

use simdnbt::owned::NbtCompound;
use strata_utils::codec::VarInt;
use strata_utils::serial::{ReadFrom, WriteTo, write_string};
use strata_utils::text::TextComponent;
use strata_world::Column;

use crate::connection_state::ConnectionProtocol;
use crate::packet::{ClientPacket, ServerPacket};

#[derive(Debug, Clone, Copy)]
pub struct KeepAliveClient {
    pub id: i64,
}

impl ReadFrom for KeepAliveClient {
    fn read(data: &mut impl Read) -> Result<Self> {
        Ok(Self { id: i64::read(data)? })
    }
}
impl ServerPacket for KeepAliveClient {}

#[derive(Debug, Clone)]
pub struct Disconnect {
    pub reason: TextComponent,
}

impl WriteTo for Disconnect {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.reason.write(writer)
    }
}
impl ClientPacket for Disconnect {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Play).then_some(0x1A)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeepAliveServer {
    pub id: i64,
}

impl WriteTo for KeepAliveServer {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.id.write(writer)
    }
}
impl ClientPacket for KeepAliveServer {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Play).then_some(0x21)
    }
}

/// A full chunk column: section/biome storage plus height-maps and any
/// tile-entity blobs the caller already has NBT-encoded.
#[derive(Debug, Clone)]
pub struct ChunkData {
    pub column: Column,
    pub heightmaps: NbtCompound,
    pub tile_entities: Vec<NbtCompound>,
}

impl WriteTo for ChunkData {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.column.chunk_x().write(writer)?;
        self.column.chunk_z().write(writer)?;
        self.column.write_bitmask(writer)?;
        self.heightmaps.write(writer)?;

        let mut section_blob = Vec::new();
        self.column.write_section_blob(&mut section_blob)?;
        strata_utils::serial::write_byte_slice(&section_blob, writer)?;

        VarInt(self.tile_entities.len() as i32).write(writer)?;
        for tile in &self.tile_entities {
            tile.write(writer)?;
        }
        Ok(())
    }
}
impl ClientPacket for ChunkData {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Play).then_some(0x22)
    }
}

/// The login handshake packet that moves a client into the world. Dimension
/// codec/type NBT is supplied by the embedding application as already-built
/// opaque bytes (see `strata_utils::codec::nbt`) and written ahead of this
/// body — this struct only covers the scalar fields vanilla's `JoinGame`
/// carries alongside them.
#[derive(Debug, Clone)]
pub struct JoinGame {
    pub entity_id: i32,
    pub is_hardcore: bool,
    pub dimension_names: Vec<String>,
    pub view_distance: i32,
    pub simulation_distance: i32,
    pub reduced_debug_info: bool,
    pub enable_respawn_screen: bool,
    pub is_debug: bool,
    pub is_flat: bool,
    pub dimension_type: String,
    pub dimension_name: String,
    pub hashed_seed: i64,
    pub game_mode: u8,
    pub previous_game_mode: i8,
    pub is_death_location_present: bool,
    pub portal_cooldown: i32,
}

impl WriteTo for JoinGame {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.entity_id.write(writer)?;
        self.is_hardcore.write(writer)?;

        VarInt(self.dimension_names.len() as i32).write(writer)?;
        for name in &self.dimension_names {
            write_string(name, writer)?;
        }

        // legacy max-players placeholder, unused by modern clients
        VarInt(0).write(writer)?;
        VarInt(self.view_distance).write(writer)?;
        VarInt(self.simulation_distance).write(writer)?;
        self.reduced_debug_info.write(writer)?;
        self.enable_respawn_screen.write(writer)?;
        self.is_debug.write(writer)?;
        self.is_flat.write(writer)?;
        write_string(&self.dimension_type, writer)?;
        write_string(&self.dimension_name, writer)?;
        self.hashed_seed.write(writer)?;
        self.game_mode.write(writer)?;
        self.previous_game_mode.write(writer)?;
        self.is_death_location_present.write(writer)?;
        VarInt(self.portal_cooldown).write(writer)
    }
}
impl ClientPacket for JoinGame {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Play).then_some(0x26)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PositionAndLook {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub flags: u8,
    pub teleport_id: i32,
    pub dismount: bool,
}

impl WriteTo for PositionAndLook {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.x.write(writer)?;
        self.y.write(writer)?;
        self.z.write(writer)?;
        self.yaw.write(writer)?;
        self.pitch.write(writer)?;
        self.flags.write(writer)?;
        VarInt(self.teleport_id).write(writer)?;
        self.dismount.write(writer)
    }
}
impl ClientPacket for PositionAndLook {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Play).then_some(0x38)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateViewPosition {
    pub chunk_x: i32,
    pub chunk_z: i32,
}

impl WriteTo for UpdateViewPosition {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        VarInt(self.chunk_x).write(writer)?;
        VarInt(self.chunk_z).write(writer)
    }
}
impl ClientPacket for UpdateViewPosition {
    fn get_id(&self, protocol: ConnectionProtocol) -> Option<i32> {
        matches!(protocol, ConnectionProtocol::Play).then_some(0x49)
    }
}
