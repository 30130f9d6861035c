use std::io::{Read, Result};

use uuid::Uuid;

use super::ReadFrom;

macro_rules! impl_read_be {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ReadFrom for $ty {
                fn read(data: &mut impl Read) -> Result<Self> {
                    let mut buf = [0; size_of::<Self>()];
                    data.read_exact(&mut buf)?;
                    Ok(Self::from_be_bytes(buf))
                }
            }
        )*
    };
}

impl_read_be!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl ReadFrom for bool {
    fn read(data: &mut impl Read) -> Result<Self> {
        Ok(u8::read(data)? == 1)
    }
}

impl<T: ReadFrom> ReadFrom for Option<T> {
    fn read(data: &mut impl Read) -> Result<Self> {
        if bool::read(data)? {
            Ok(Some(T::read(data)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: ReadFrom, const N: usize> ReadFrom for [T; N] {
    fn read(data: &mut impl Read) -> Result<Self> {
        std::array::try_from_fn(|_| T::read(data))
    }
}

impl ReadFrom for Uuid {
    fn read(data: &mut impl Read) -> Result<Self> {
        let most = u64::read(data)?;
        let least = u64::read(data)?;
        Ok(Uuid::from_u64_pair(most, least))
    }
}
