//! Little-endian field helpers for linear memory layouts.

use super::{AbiError, Addr};

/// Bounds-checked view of `len` bytes at `offset`.
#[inline]
pub fn read_slice(buffer: &[u8], offset: Addr, len: u32) -> Result<&[u8], AbiError> {
    let start = offset as usize;
    start
        .checked_add(len as usize)
        .and_then(|end| buffer.get(start..end))
        .ok_or(AbiError::MemoryRead {
            offset,
            len,
            memory_size: buffer.len(),
        })
}

/// Bounds-checked copy of `data` to `offset`. Nothing is written on failure.
#[inline]
pub fn write_slice(buffer: &mut [u8], offset: Addr, data: &[u8]) -> Result<(), AbiError> {
    let memory_size = buffer.len();
    let start = offset as usize;
    start
        .checked_add(data.len())
        .and_then(|end| buffer.get_mut(start..end))
        .ok_or(AbiError::MemoryWrite {
            offset,
            len: data.len() as u32,
            memory_size,
        })?
        .copy_from_slice(data);
    Ok(())
}

/// Decode a little-endian u32 from the start of `bytes`, zero-filling any
/// missing tail.
#[inline]
pub fn read_u32_le(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    for (dst, src) in word.iter_mut().zip(bytes) {
        *dst = *src;
    }
    u32::from_le_bytes(word)
}

/// Encode a `(first, second)` pair of u32 as 8 little-endian bytes.
#[inline]
pub fn u32_pair_le(first: u32, second: u32) -> [u8; 8] {
    let mut out = [0u8; 8];
    let (lo, hi) = out.split_at_mut(4);
    lo.copy_from_slice(&first.to_le_bytes());
    hi.copy_from_slice(&second.to_le_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_slice_rejects_overflowing_range() {
        let buf = [0u8; 16];
        assert!(read_slice(&buf, u32::MAX, u32::MAX).is_err());
        assert_eq!(read_slice(&buf, 12, 4).map(<[u8]>::len), Ok(4));
        assert!(read_slice(&buf, 13, 4).is_err());
    }

    #[test]
    fn write_slice_leaves_buffer_untouched_on_failure() {
        let mut buf = [7u8; 4];
        assert!(write_slice(&mut buf, 2, &[1, 2, 3]).is_err());
        assert_eq!(buf, [7, 7, 7, 7]);
    }

    #[test]
    fn pair_layout_is_little_endian() {
        assert_eq!(u32_pair_le(0x0102_0304, 5), [4, 3, 2, 1, 5, 0, 0, 0]);
        assert_eq!(read_u32_le(&[4, 3, 2, 1]), 0x0102_0304);
        assert_eq!(read_u32_le(&[9]), 9);
    }
}
