//! Server -> client frame encoding: writes pre-built [`EncodedPacket`]s and
//! installs encryption on the stream mid-flight.

use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use aes::cipher::KeyIvInit;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::cipher::{Aes128Cfb8Enc, StreamEncryptor};
use crate::encoded_packet::EncodedPacket;
use crate::errors::PacketError;

enum EncryptionWriter<W: AsyncWrite + Unpin> {
    Plain(W),
    Encrypt(Box<StreamEncryptor<W>>),
}

impl<W: AsyncWrite + Unpin> EncryptionWriter<W> {
    fn upgrade(self, cipher: Aes128Cfb8Enc) -> Self {
        match self {
            Self::Plain(stream) => Self::Encrypt(Box::new(StreamEncryptor::new(cipher, stream))),
            Self::Encrypt(_) => panic!("stream is already encrypted"),
        }
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for EncryptionWriter<W> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(writer) => Pin::new(writer).poll_write(cx, buf),
            Self::Encrypt(writer) => Pin::new(writer).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(writer) => Pin::new(writer).poll_flush(cx),
            Self::Encrypt(writer) => Pin::new(writer).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(writer) => Pin::new(writer).poll_shutdown(cx),
            Self::Encrypt(writer) => Pin::new(writer).poll_shutdown(cx),
        }
    }
}

/// Encodes the server -> client frame stream from pre-built [`EncodedPacket`]s.
pub struct TCPNetworkEncoder<W: AsyncWrite + Unpin> {
    writer: EncryptionWriter<W>,
}

impl<W: AsyncWrite + Unpin> TCPNetworkEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: EncryptionWriter::Plain(writer),
        }
    }

    /// # Panics
    /// If encryption is already installed, or the key is the wrong length.
    pub fn set_encryption(&mut self, key: &[u8; 16]) {
        if matches!(self.writer, EncryptionWriter::Encrypt(_)) {
            panic!("stream is already encrypted");
        }
        let cipher = Aes128Cfb8Enc::new_from_slices(key, key).expect("16-byte key is valid");
        replace_with::replace_with_or_abort(&mut self.writer, |writer| writer.upgrade(cipher));
    }

    pub async fn write_packet(&mut self, packet: &EncodedPacket) -> Result<(), PacketError> {
        self.writer.write_all(&packet.encoded_data).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
