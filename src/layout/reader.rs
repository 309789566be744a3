//! Little-endian primitive reads over a byte buffer.
//!
//! Every read is bounds-checked, including against `offset + width`
//! overflowing `usize`. These are the only functions in the crate that
//! index into raw bytes.

use crate::error::{BookError, Result};

/// Borrow `len` bytes starting at `offset`.
#[inline]
pub fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or(BookError::OutOfRange {
            offset,
            width: len,
            len: buf.len(),
        })
}

/// Copy `N` bytes starting at `offset` into an array.
#[inline]
pub fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(read_bytes(buf, offset, N)?);
    Ok(out)
}

#[inline]
pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    Ok(read_array::<1>(buf, offset)?[0])
}

#[inline]
pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    read_array(buf, offset).map(u32::from_le_bytes)
}

#[inline]
pub fn read_u64(buf: &[u8], offset: usize) -> Result<u64> {
    read_array(buf, offset).map(u64::from_le_bytes)
}

#[inline]
pub fn read_i64(buf: &[u8], offset: usize) -> Result<i64> {
    read_array(buf, offset).map(i64::from_le_bytes)
}

#[inline]
pub fn read_u128(buf: &[u8], offset: usize) -> Result<u128> {
    read_array(buf, offset).map(u128::from_le_bytes)
}

// ============================================================================
// Unit Tests
// ============================================================================
