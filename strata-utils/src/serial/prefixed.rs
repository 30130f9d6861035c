use std::io::{Read, Result, Write};

use crate::codec::VarInt;

use super::{ReadFrom, WriteTo};

/// A value prefixed by its encoded-length count `L` (typically a [`VarInt`]).
pub trait PrefixedRead<L>: Sized {
    fn read_prefixed(data: &mut impl Read) -> Result<Self>;
}

/// The counterpart of [`PrefixedRead`] for writing.
pub trait PrefixedWrite<L> {
    fn write_prefixed(&self, writer: &mut impl Write) -> Result<()>;
}

impl PrefixedRead<VarInt> for String {
    fn read_prefixed(data: &mut impl Read) -> Result<Self> {
        let len = VarInt::read(data)?.0 as usize;
        let mut buf = vec![0u8; len];
        data.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(std::io::Error::other)
    }
}

impl PrefixedWrite<VarInt> for str {
    fn write_prefixed(&self, writer: &mut impl Write) -> Result<()> {
        VarInt(self.len() as i32).write(writer)?;
        writer.write_all(self.as_bytes())
    }
}

impl PrefixedWrite<VarInt> for String {
    fn write_prefixed(&self, writer: &mut impl Write) -> Result<()> {
        <str as PrefixedWrite<VarInt>>::write_prefixed(self.as_str(), writer)
    }
}

impl<T: ReadFrom> PrefixedRead<VarInt> for Vec<T> {
    fn read_prefixed(data: &mut impl Read) -> Result<Self> {
        let len = VarInt::read(data)?.0 as usize;
        let mut out = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            out.push(T::read(data)?);
        }
        Ok(out)
    }
}

impl<T: WriteTo> PrefixedWrite<VarInt> for [T] {
    fn write_prefixed(&self, writer: &mut impl Write) -> Result<()> {
        VarInt(self.len() as i32).write(writer)?;
        for item in self {
            item.write(writer)?;
        }
        Ok(())
    }
}

