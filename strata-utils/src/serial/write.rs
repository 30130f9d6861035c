use std::io::{Result, Write};

use uuid::Uuid;

use super::WriteTo;

macro_rules! impl_write_be {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WriteTo for $ty {
                fn write(&self, writer: &mut impl Write) -> Result<()> {
                    writer.write_all(&self.to_be_bytes())
                }
            }
        )*
    };
}

impl_write_be!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl WriteTo for bool {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        u8::from(*self).write(writer)
    }
}

impl<T: WriteTo> WriteTo for Option<T> {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        match self {
            Some(value) => {
                true.write(writer)?;
                value.write(writer)
            }
            None => false.write(writer),
        }
    }
}

impl<T: WriteTo, const N: usize> WriteTo for [T; N] {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        for item in self {
            item.write(writer)?;
        }
        Ok(())
    }
}

impl WriteTo for Uuid {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        let (most, least) = self.as_u64_pair();
        most.write(writer)?;
        least.write(writer)
    }
}
