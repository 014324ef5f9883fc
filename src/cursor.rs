//! Bounds-checked forward reader over a captured frame
//!
//! Every header walked by the dissector is read through a [`ByteCursor`]. Reads are
//! delegated to `nom` streaming parsers running over the bytes that remain, so a read
//! that would go past the end of the frame fails with [`DissectError::Truncated`]
//! and leaves the position untouched.

use nom::bytes::streaming::take;
use nom::number::streaming::{be_u16, be_u32, be_u64, be_u8};
use nom::IResult;

use crate::error::DissectError;

/// Read position into a borrowed byte buffer
///
/// Invariant: `position() <= frame_len()`.
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { data, pos: 0 }
    }

    /// Number of bytes consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Bytes not consumed yet
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }

    /// Check that at least `n` bytes remain, without consuming them
    pub fn require(&self, n: usize) -> Result<(), DissectError> {
        if self.remaining_len() < n {
            return Err(DissectError::Truncated);
        }
        Ok(())
    }

    /// Run a parser over the remaining bytes, and advance by what it consumed
    ///
    /// On error, the position is not modified.
    pub fn read_with<T, F>(&mut self, mut parser: F) -> Result<T, DissectError>
    where
        F: FnMut(&'a [u8]) -> IResult<&'a [u8], T, DissectError>,
    {
        let input = self.remaining();
        let (rem, value) = parser(input)?;
        self.pos += input.len().saturating_sub(rem.len());
        Ok(value)
    }

    pub fn peek_u8(&self) -> Result<u8, DissectError> {
        let (_, b) = be_u8::<_, DissectError>(self.remaining())?;
        Ok(b)
    }

    pub fn consume_u8(&mut self) -> Result<u8, DissectError> {
        self.read_with(be_u8)
    }

    pub fn consume_u16be(&mut self) -> Result<u16, DissectError> {
        self.read_with(be_u16)
    }

    pub fn consume_u32be(&mut self) -> Result<u32, DissectError> {
        self.read_with(be_u32)
    }

    pub fn consume_u64be(&mut self) -> Result<u64, DissectError> {
        self.read_with(be_u64)
    }

    pub fn consume_array<const N: usize>(&mut self) -> Result<[u8; N], DissectError> {
        self.read_with(be_array)
    }

    /// Consume `n` bytes and return them
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DissectError> {
        self.read_with(take(n))
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DissectError> {
        self.take(n).map(|_| ())
    }
}

/// Read a fixed-size array (addresses, MACs)
pub(crate) fn be_array<const N: usize>(i: &[u8]) -> IResult<&[u8], [u8; N], DissectError> {
    let (i, bytes) = take(N)(i)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok((i, out))
}
