use std::{
    io::{self, Write},
    ops::{Deref, DerefMut},
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::AsyncWrite;

/// A vec with reservable front space, used so a packet's length prefix can be
/// written after its body without a second allocation.
///
/// Calling `set_in_front` repeatedly fills the reserved space back-to-front,
/// i.e. in the reverse order of `extend_from_slice`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrontVec {
    buf: Vec<u8>,
    front_space: usize,
}

impl FrontVec {
    /// Creates a `FrontVec` with `reserve` bytes of front space and enough
    /// backing capacity for `reserve + capacity` bytes total.
    #[must_use]
    pub fn with_capacity(reserve: usize, capacity: usize) -> Self {
        let mut buf = vec![0u8; reserve];
        buf.reserve_exact(capacity);
        Self {
            buf,
            front_space: reserve,
        }
    }

    /// Creates a `FrontVec` with `reserve` bytes of front space.
    #[must_use]
    pub fn new(reserve: usize) -> Self {
        Self::with_capacity(reserve, 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len() - self.front_space
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn extend_from_slice(&mut self, other: &[u8]) {
        self.buf.extend_from_slice(other);
    }

    /// Writes `other` into the remaining front space, closest-to-body first.
    ///
    /// # Panics
    /// Panics if there isn't enough reserved space left.
    #[track_caller]
    pub fn set_in_front(&mut self, other: &[u8]) {
        assert!(
            self.front_space >= other.len(),
            "not enough reserved front space"
        );
        let new_start = self.front_space - other.len();
        self.buf[new_start..self.front_space].copy_from_slice(other);
        self.front_space = new_start;
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.front_space..]
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let start = self.front_space;
        &mut self.buf[start..]
    }
}

impl Write for FrontVec {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsyncWrite for FrontVec {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        this.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl Deref for FrontVec {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl DerefMut for FrontVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_space_reservation_and_write() {
        let mut fv = FrontVec::with_capacity(4, 8);
        assert_eq!(fv.len(), 0);

        fv.extend_from_slice(&[1, 2, 3]);
        assert_eq!(fv.as_slice(), &[1, 2, 3]);

        fv.set_in_front(&[0xAA, 0xBB]);
        assert_eq!(fv.as_slice(), &[0xAA, 0xBB, 1, 2, 3]);

        fv.set_in_front(&[0xCC]);
        assert_eq!(fv.as_slice(), &[0xCC, 0xAA, 0xBB, 1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "not enough reserved front space")]
    fn set_in_front_panics_if_no_space() {
        let mut fv = FrontVec::with_capacity(2, 4);
        fv.set_in_front(&[1, 2, 3]);
    }
}
