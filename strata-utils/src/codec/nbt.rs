use std::io::{Result, Write};

use simdnbt::owned::{NbtCompound, NbtTag};

use crate::serial::WriteTo;

/// Big-endian named compound tag, delegated entirely to `simdnbt`'s own
/// encoder — NBT's internal tag grammar is out of scope here. Every packet
/// this library writes carries NBT outbound only (height-maps, block-entity
/// blobs the caller already decoded); nothing in the wire surface requires
/// decoding NBT on the inbound side.
impl WriteTo for NbtCompound {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        let mut buf = Vec::new();
        NbtCompound::write(self, &mut buf);
        writer.write_all(&buf)
    }
}

impl WriteTo for NbtTag {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        let mut buf = Vec::new();
        NbtTag::write(self, &mut buf);
        writer.write_all(&buf)
    }
}
