//! Client -> server frame decoding: length-prefixed, optionally zlib
//! compressed, optionally AES-CFB8 decrypted.

use std::{
    io::{self, Read},
    num::NonZeroU32,
    pin::Pin,
    task::{Context, Poll},
};

use aes::cipher::KeyIvInit;
use flate2::read::ZlibDecoder;
use strata_utils::codec::VarInt;
use strata_utils::serial::ReadFrom;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

use crate::cipher::{Aes128Cfb8Dec, StreamDecryptor};
use crate::errors::{FrameError, MAX_PACKET_DATA_SIZE, MAX_PACKET_SIZE, PacketError};
use crate::packet::RawPacket;

/// Either a plain reader or one wrapped in AES-CFB8 decryption — encryption
/// can only be turned on mid-stream, never off.
enum DecryptionReader<R: AsyncRead + Unpin> {
    Plain(R),
    Decrypt(Box<StreamDecryptor<R>>),
}

impl<R: AsyncRead + Unpin> DecryptionReader<R> {
    fn upgrade(self, cipher: Aes128Cfb8Dec) -> Self {
        match self {
            Self::Plain(stream) => Self::Decrypt(Box::new(StreamDecryptor::new(cipher, stream))),
            Self::Decrypt(_) => panic!("stream is already encrypted"),
        }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for DecryptionReader<R> {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(reader) => Pin::new(reader).poll_read(cx, buf),
            Self::Decrypt(reader) => Pin::new(reader).poll_read(cx, buf),
        }
    }
}

/// Decodes the client -> server frame stream into [`RawPacket`]s.
pub struct TCPNetworkDecoder<R: AsyncRead + Unpin> {
    reader: DecryptionReader<R>,
    compression: Option<NonZeroU32>,
}

impl<R: AsyncRead + Unpin> TCPNetworkDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: DecryptionReader::Plain(reader),
            compression: None,
        }
    }

    pub fn set_compression(&mut self, threshold: NonZeroU32) {
        self.compression = Some(threshold);
    }

    /// # Panics
    /// If encryption is already installed, or the key is the wrong length.
    pub fn set_encryption(&mut self, key: &[u8; 16]) {
        if matches!(self.reader, DecryptionReader::Decrypt(_)) {
            panic!("stream is already encrypted");
        }
        let cipher = Aes128Cfb8Dec::new_from_slices(key, key).expect("16-byte key is valid");
        replace_with::replace_with_or_abort(&mut self.reader, |reader| reader.upgrade(cipher));
    }

    #[allow(clippy::cast_sign_loss)]
    pub async fn get_raw_packet(&mut self) -> Result<RawPacket, PacketError> {
        let packet_len = VarInt::read_async(&mut self.reader).await? as usize;
        if packet_len > MAX_PACKET_SIZE {
            return Err(FrameError::OutOfBounds.into());
        }

        let mut packet_data = vec![0u8; packet_len];
        self.reader.read_exact(&mut packet_data).await?;

        let mut cursor = io::Cursor::new(packet_data);

        let decompressed_data = if let Some(threshold) = self.compression {
            let decompressed_len = VarInt::read(&mut cursor)?.0 as usize;
            let raw_packet_len = packet_len - VarInt::written_size(decompressed_len as i32);

            if decompressed_len > MAX_PACKET_DATA_SIZE {
                return Err(FrameError::TooLong(decompressed_len).into());
            }

            if decompressed_len > 0 {
                let mut decompressed = Vec::with_capacity(decompressed_len);
                ZlibDecoder::new(&mut cursor)
                    .read_to_end(&mut decompressed)
                    .map_err(|err| FrameError::DecompressionFailed(err.to_string()))?;
                decompressed
            } else {
                if raw_packet_len > threshold.get() as usize {
                    return Err(FrameError::NotCompressed.into());
                }
                let pos = cursor.position() as usize;
                cursor.into_inner()[pos..].to_vec()
            }
        } else {
            cursor.into_inner()
        };

        let mut cursor = io::Cursor::new(decompressed_data);
        let packet_id = VarInt::read(&mut cursor)?.0;
        let pos = cursor.position() as usize;
        let payload = cursor.into_inner()[pos..].to_vec();

        Ok(RawPacket {
            id: packet_id,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{Aes128Cfb8Enc, StreamEncryptor};
    use flate2::write::ZlibEncoder;
    use std::io::Write;
    use strata_utils::serial::WriteTo;
    use tokio::io::AsyncWriteExt;

    fn build_packet(id: i32, payload: &[u8], compress: Option<NonZeroU32>) -> Vec<u8> {
        let mut inner = Vec::new();
        VarInt(id).write(&mut inner).unwrap();
        inner.extend_from_slice(payload);

        let mut framed = Vec::new();
        if let Some(_threshold) = compress {
            let mut compressed = Vec::new();
            ZlibEncoder::new(&mut compressed, flate2::Compression::default())
                .write_all(&inner)
                .unwrap();
            VarInt(inner.len() as i32).write(&mut framed).unwrap();
            framed.extend_from_slice(&compressed);
        } else {
            framed = inner;
        }

        let mut packet = Vec::new();
        VarInt(framed.len() as i32).write(&mut packet).unwrap();
        packet.extend_from_slice(&framed);
        packet
    }

    #[tokio::test]
    async fn decodes_uncompressed_unencrypted_frame() {
        let packet = build_packet(1, b"hello", None);
        let mut decoder = TCPNetworkDecoder::new(packet.as_slice());
        let raw = decoder.get_raw_packet().await.unwrap();
        assert_eq!(raw.id, 1);
        assert_eq!(raw.payload, b"hello");
    }

    #[tokio::test]
    async fn decodes_compressed_frame_above_threshold() {
        let threshold = NonZeroU32::new(1).unwrap();
        let packet = build_packet(2, b"a body long enough to compress", Some(threshold));
        let mut decoder = TCPNetworkDecoder::new(packet.as_slice());
        decoder.set_compression(threshold);
        let raw = decoder.get_raw_packet().await.unwrap();
        assert_eq!(raw.id, 2);
        assert_eq!(raw.payload, b"a body long enough to compress");
    }

    #[tokio::test]
    async fn decodes_encrypted_frame() {
        let key = [7u8; 16];
        let packet = build_packet(3, b"secret", None);

        let mut encrypted = Vec::new();
        {
            let cipher = Aes128Cfb8Enc::new_from_slices(&key, &key).unwrap();
            let mut encryptor = StreamEncryptor::new(cipher, &mut encrypted);
            encryptor.write_all(&packet).await.unwrap();
            encryptor.flush().await.unwrap();
        }

        let mut decoder = TCPNetworkDecoder::new(encrypted.as_slice());
        decoder.set_encryption(&key);
        let raw = decoder.get_raw_packet().await.unwrap();
        assert_eq!(raw.id, 3);
        assert_eq!(raw.payload, b"secret");
    }

    #[tokio::test]
    async fn zero_length_declared_uncompressed_size_reads_rest_as_raw() {
        let packet = build_packet(7, b"", None);
        let mut decoder = TCPNetworkDecoder::new(packet.as_slice());
        let raw = decoder.get_raw_packet().await.unwrap();
        assert_eq!(raw.id, 7);
        assert!(raw.payload.is_empty());
    }
}
