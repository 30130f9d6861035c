//! AES-128 CFB-8 stream cipher adapters over `AsyncRead`/`AsyncWrite`, so
//! encryption composes with the frame codec instead of buffering whole
//! frames before encrypting.

use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, BlockSizeUser, generic_array::GenericArray};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// AES-128 in CFB mode with an 8-bit (one byte) feedback segment.
pub type Aes128Cfb8Enc = cfb8::Encryptor<aes::Aes128>;
/// Decrypting counterpart of [`Aes128Cfb8Enc`].
pub type Aes128Cfb8Dec = cfb8::Decryptor<aes::Aes128>;

/// Encrypts every byte written through it before forwarding to `W`.
pub struct StreamEncryptor<W: AsyncWrite + Unpin> {
    cipher: Aes128Cfb8Enc,
    write: W,
    last_unwritten_encrypted_byte: Option<u8>,
}

impl<W: AsyncWrite + Unpin> StreamEncryptor<W> {
    #[must_use]
    pub fn new(cipher: Aes128Cfb8Enc, stream: W) -> Self {
        debug_assert_eq!(Aes128Cfb8Enc::block_size(), 1);
        Self {
            cipher,
            write: stream,
            last_unwritten_encrypted_byte: None,
        }
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for StreamEncryptor<W> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let mut total_written = 0;

        for block in buf.chunks(Aes128Cfb8Enc::block_size()) {
            let mut out = [0u8];
            if let Some(pending) = this.last_unwritten_encrypted_byte {
                out[0] = pending;
            } else {
                let out_block = GenericArray::from_mut_slice(&mut out);
                this.cipher.encrypt_block_b2b_mut(block.into(), out_block);
            }

            match Pin::new(&mut this.write).poll_write(cx, &out) {
                Poll::Pending => {
                    this.last_unwritten_encrypted_byte = Some(out[0]);
                    return if total_written == 0 {
                        Poll::Pending
                    } else {
                        Poll::Ready(Ok(total_written))
                    };
                }
                Poll::Ready(result) => {
                    this.last_unwritten_encrypted_byte = None;
                    match result {
                        Ok(written) => total_written += written,
                        Err(err) => return Poll::Ready(Err(err)),
                    }
                }
            }
        }

        Poll::Ready(Ok(total_written))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().write).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().write).poll_shutdown(cx)
    }
}

/// Decrypts every byte read from `R` before handing it back to the caller.
pub struct StreamDecryptor<R: AsyncRead + Unpin> {
    cipher: Aes128Cfb8Dec,
    read: R,
}

impl<R: AsyncRead + Unpin> StreamDecryptor<R> {
    #[must_use]
    pub fn new(cipher: Aes128Cfb8Dec, stream: R) -> Self {
        Self {
            cipher,
            read: stream,
        }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for StreamDecryptor<R> {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let original_fill = buf.filled().len();
        let poll = Pin::new(&mut this.read).poll_read(cx, buf);

        if matches!(poll, Poll::Ready(Ok(()))) {
            for block in buf.filled_mut()[original_fill..].chunks_mut(Aes128Cfb8Dec::block_size()) {
                this.cipher.decrypt_block_mut(block.into());
            }
        }

        poll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::KeyIvInit;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn round_trips_through_matching_key_streams() {
        let key = [0x42u8; 16];
        let plaintext = b"the lazy parrot flies south for winter";

        let enc_cipher = Aes128Cfb8Enc::new_from_slices(&key, &key).unwrap();
        let mut encrypted = Vec::new();
        {
            let mut encryptor = StreamEncryptor::new(enc_cipher, &mut encrypted);
            encryptor.write_all(plaintext).await.unwrap();
            encryptor.flush().await.unwrap();
        }
        assert_ne!(encrypted, plaintext);

        let dec_cipher = Aes128Cfb8Dec::new_from_slices(&key, &key).unwrap();
        let mut decryptor = StreamDecryptor::new(dec_cipher, encrypted.as_slice());
        let mut decrypted = Vec::new();
        decryptor.read_to_end(&mut decrypted).await.unwrap();

        assert_eq!(decrypted, plaintext);
    }
}
