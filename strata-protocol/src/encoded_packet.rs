//! A pre-encoded, optionally compressed packet frame ready to hand to the
//! writer task — built once so a broadcast packet (e.g. `ChunkData` to many
//! viewers) isn't re-serialized per recipient.

use std::io::Write;
use std::num::NonZeroU32;
use std::sync::Arc;

use flate2::{Compression, write::ZlibEncoder};
use strata_utils::{FrontVec, codec::VarInt, serial::WriteTo};

use crate::connection_state::ConnectionProtocol;
use crate::errors::{FrameError, MAX_PACKET_DATA_SIZE, MAX_PACKET_SIZE, PacketError};
use crate::packet::ClientPacket;

/// Compression parameters installed by `SetCompression`.
#[derive(Copy, Clone, Debug)]
pub struct CompressionInfo {
    pub threshold: NonZeroU32,
    /// zlib level, `0..=9`; `9` favors ratio over speed.
    pub level: i32,
}

impl Default for CompressionInfo {
    fn default() -> Self {
        Self {
            threshold: NonZeroU32::new(256).expect("256 is nonzero"),
            level: 4,
        }
    }
}

/// A fully framed packet: length prefix, optional compression header,
/// packet ID, and body, ready to write to the socket verbatim.
#[derive(Clone)]
pub struct EncodedPacket {
    pub encoded_data: Arc<FrontVec>,
}

impl EncodedPacket {
    /// Encodes `packet`, applying compression when `compression` is set and
    /// the body meets its threshold.
    pub fn from_bare<P: ClientPacket>(
        packet: P,
        compression: Option<CompressionInfo>,
        protocol: ConnectionProtocol,
    ) -> Result<Self, PacketError> {
        let mut buf = FrontVec::new(6);
        packet.write_packet(&mut buf, protocol)?;
        match compression {
            Some(info) => Self::from_packet_data(buf, info),
            None => Self::from_data_uncompressed(buf),
        }
    }

    fn from_data_uncompressed(mut body: FrontVec) -> Result<Self, PacketError> {
        let data_len = body.len();
        let varint_size = VarInt::written_size(data_len as i32);
        if varint_size + data_len > MAX_PACKET_SIZE {
            return Err(FrameError::TooLong(varint_size + data_len).into());
        }
        VarInt(data_len as i32).set_in_front(&mut body, varint_size);
        Ok(Self {
            encoded_data: Arc::new(body),
        })
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn from_packet_data(mut body: FrontVec, compression: CompressionInfo) -> Result<Self, PacketError> {
        let data_len = body.len();
        if data_len + VarInt::MAX_SIZE * 2 > MAX_PACKET_DATA_SIZE {
            return Err(FrameError::TooLong(data_len).into());
        }

        if data_len >= compression.threshold.get() as usize {
            let mut buf = FrontVec::new(10);
            let mut compressor = ZlibEncoder::new(&mut buf, Compression::new(compression.level as u32));
            compressor
                .write_all(&body)
                .map_err(|err| FrameError::CompressionFailed(err.to_string()))?;
            compressor
                .finish()
                .map_err(|err| FrameError::CompressionFailed(err.to_string()))?;

            let varint_size = VarInt::written_size(data_len as i32);
            let full_len = varint_size + buf.len();
            let full_varint_size = VarInt::written_size(full_len as i32);
            VarInt(data_len as i32).set_in_front(&mut buf, varint_size);
            VarInt(full_len as i32).set_in_front(&mut buf, full_varint_size);
            Ok(Self {
                encoded_data: Arc::new(buf),
            })
        } else {
            let data_len_with_header = data_len + 1;
            let varint_size = VarInt::written_size(data_len_with_header as i32);
            VarInt(0).set_in_front(&mut body, 1);
            VarInt(data_len_with_header as i32).set_in_front(&mut body, varint_size);
            Ok(Self {
                encoded_data: Arc::new(body),
            })
        }
    }
}
