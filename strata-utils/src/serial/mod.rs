//! The `ReadFrom`/`WriteTo` primitive serialization traits and their
//! standard-library/uuid/text implementations.

mod prefixed;
mod read;
mod write;

pub use prefixed::{PrefixedRead, PrefixedWrite};

use std::io::{Read, Result, Write};

/// A value that can be read off the front of a byte stream.
pub trait ReadFrom: Sized {
    fn read(data: &mut impl Read) -> Result<Self>;
}

/// A value that can be written to a byte stream.
pub trait WriteTo {
    fn write(&self, writer: &mut impl Write) -> Result<()>;
}

/// A varint-length-prefixed UTF-8 string, the wire format every packet's
/// string fields use.
pub fn read_string(data: &mut impl Read) -> Result<String> {
    <String as PrefixedRead<crate::codec::VarInt>>::read_prefixed(data)
}

pub fn write_string(value: &str, writer: &mut impl Write) -> Result<()> {
    <str as PrefixedWrite<crate::codec::VarInt>>::write_prefixed(value, writer)
}

/// A varint-length-prefixed byte array, the wire format for opaque blobs
/// (encrypted secrets, verify tokens, compressed NBT, ...).
pub fn read_byte_vec(data: &mut impl Read) -> Result<Vec<u8>> {
    <Vec<u8> as PrefixedRead<crate::codec::VarInt>>::read_prefixed(data)
}

pub fn write_byte_slice(value: &[u8], writer: &mut impl Write) -> Result<()> {
    <[u8] as PrefixedWrite<crate::codec::VarInt>>::write_prefixed(value, writer)
}
