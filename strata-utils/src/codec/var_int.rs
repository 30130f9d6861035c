use std::io::{Cursor, Error, ErrorKind, Read, Result, Write};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::front_vec::FrontVec;
use crate::serial::{ReadFrom, WriteTo};

/// A LEB128-style variable-length 32-bit integer: 7 data bits per byte, MSB
/// as the continuation flag, little-endian byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub i32);

impl VarInt {
    /// A varint never takes more than 5 bytes to encode an `i32`.
    pub const MAX_SIZE: usize = 5;

    /// The exact number of bytes `VarInt(val)` will write.
    #[must_use]
    pub fn written_size(val: i32) -> usize {
        match val {
            0 => 1,
            n => (31 - n.leading_zeros() as usize) / 7 + 1,
        }
    }

    pub async fn read_async(read: &mut (impl AsyncRead + Unpin)) -> Result<i32> {
        let mut val = 0i32;
        for i in 0..Self::MAX_SIZE {
            let byte = read
                .read_u8()
                .await
                .map_err(|err| Error::new(err.kind(), "VarInt"))?;
            val |= (i32::from(byte) & 0x7F) << (i * 7);
            if byte & 0x80 == 0 {
                return Ok(val);
            }
        }
        Err(Error::new(ErrorKind::InvalidData, "VarInt too long"))
    }

    pub async fn write_async(self, write: &mut (impl AsyncWrite + Unpin)) -> Result<()> {
        let mut val = self.0;
        loop {
            let b = (val as u8) & 0x7F;
            val = ((val as u32) >> 7) as i32;
            if val == 0 {
                write.write_u8(b).await?;
                break;
            }
            write.write_u8(b | 0x80).await?;
        }
        Ok(())
    }

    /// Writes this varint into the reserved front space of `vec`, assuming
    /// its encoded length is exactly `varint_size` bytes (the caller already
    /// computed that via [`Self::written_size`]).
    pub fn set_in_front(&self, vec: &mut FrontVec, varint_size: usize) {
        let mut buf = [0u8; Self::MAX_SIZE];
        self.write(&mut Cursor::new(&mut buf[..])).unwrap();
        vec.set_in_front(&buf[..varint_size]);
    }
}

impl ReadFrom for VarInt {
    fn read(data: &mut impl Read) -> Result<Self> {
        let mut val = 0i32;
        for i in 0..Self::MAX_SIZE {
            let byte = u8::read(data)?;
            val |= (i32::from(byte) & 0x7F) << (i * 7);
            if byte & 0x80 == 0 {
                return Ok(Self(val));
            }
        }
        Err(Error::new(ErrorKind::InvalidData, "VarInt too long"))
    }
}

impl WriteTo for VarInt {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        let mut val = self.0;
        loop {
            let b = (val as u8) & 0x7F;
            val = ((val as u32) >> 7) as i32;
            if val == 0 {
                b.write(writer)?;
                break;
            }
            (b | 0x80).write(writer)?;
        }
        Ok(())
    }
}

impl From<i32> for VarInt {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<VarInt> for i32 {
    fn from(value: VarInt) -> Self {
        value.0
    }
}

impl From<usize> for VarInt {
    fn from(value: usize) -> Self {
        Self(value as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_and_exact_length() {
        for value in [0, 1, -1, 127, 128, 255, 25565, i32::MAX, i32::MIN] {
            let mut buf = Vec::new();
            VarInt(value).write(&mut buf).unwrap();
            assert_eq!(buf.len(), VarInt::written_size(value));

            let mut cursor = Cursor::new(buf.as_slice());
            let decoded = VarInt::read(&mut cursor).unwrap();
            assert_eq!(decoded.0, value);
            assert_eq!(cursor.position() as usize, buf.len());
        }
    }

    #[test]
    fn overlong_continuation_fails() {
        let bytes = [0xFFu8, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut cursor = Cursor::new(&bytes[..]);
        assert!(VarInt::read(&mut cursor).is_err());
    }
}
