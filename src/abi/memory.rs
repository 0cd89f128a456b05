//! Linear memory access for memory-backed types.

use super::buffer::{read_slice, write_slice};
use super::{AbiError, Addr};

/// Access to the guest's linear memory.
///
/// Out-of-bounds requests return an error and must never panic. The
/// embedding VM implements this over its own memory; `&mut [u8]` and
/// [`LinearMemory`] implement it for in-process use.
pub trait Memory {
    /// Borrow `count` bytes starting at `offset`.
    fn read(&self, offset: Addr, count: u32) -> Result<&[u8], AbiError>;

    /// Copy `bytes` to `offset`. A failed write leaves memory untouched.
    fn write(&mut self, offset: Addr, bytes: &[u8]) -> Result<(), AbiError>;

    /// Current size of the memory in bytes.
    fn size(&self) -> usize;
}

/// Fixed-size linear memory owned by the host.
///
/// Unlike a guest allocator this never grows: every read and write is
/// checked against the size chosen at construction.
///
/// # Example
///
/// ```ignore
/// use wasm_host_abi::LinearMemory;
///
/// let mut mem = LinearMemory::new(1024);
/// mem.write(3, b"hello!")?;
/// assert_eq!(mem.read(3, 6)?, b"hello!");
/// ```
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct LinearMemory {
    data: Vec<u8>,
}

impl LinearMemory {
    /// Create a zero-filled memory of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    /// Create a memory from existing bytes.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Get the raw bytes of the linear memory.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the linear memory and return the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the length of the memory in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Zero `len` bytes at `offset`, e.g. before reusing a result region.
    pub fn clear(&mut self, offset: Addr, len: u32) -> Result<(), AbiError> {
        let memory_size = self.data.len();
        let start = offset as usize;
        let region = start
            .checked_add(len as usize)
            .and_then(|end| self.data.get_mut(start..end))
            .ok_or(AbiError::MemoryWrite {
                offset,
                len,
                memory_size,
            })?;
        region.fill(0);
        Ok(())
    }
}

impl Memory for LinearMemory {
    fn read(&self, offset: Addr, count: u32) -> Result<&[u8], AbiError> {
        read_slice(&self.data, offset, count)
    }

    fn write(&mut self, offset: Addr, bytes: &[u8]) -> Result<(), AbiError> {
        write_slice(&mut self.data, offset, bytes)
    }

    fn size(&self) -> usize {
        self.data.len()
    }
}

impl Memory for &mut [u8] {
    fn read(&self, offset: Addr, count: u32) -> Result<&[u8], AbiError> {
        read_slice(self, offset, count)
    }

    fn write(&mut self, offset: Addr, bytes: &[u8]) -> Result<(), AbiError> {
        write_slice(self, offset, bytes)
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl From<Vec<u8>> for LinearMemory {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<LinearMemory> for Vec<u8> {
    fn from(memory: LinearMemory) -> Self {
        memory.data
    }
}

impl AsRef<[u8]> for LinearMemory {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_beyond_size_is_an_error() {
        let mem = LinearMemory::new(16);
        assert_eq!(
            mem.read(20, 10),
            Err(AbiError::MemoryRead {
                offset: 20,
                len: 10,
                memory_size: 16
            })
        );
    }

    #[test]
    fn write_never_grows_memory() -> Result<(), AbiError> {
        let mut mem = LinearMemory::new(8);
        mem.write(4, &[1, 2, 3, 4])?;
        assert!(mem.write(6, &[1, 2, 3]).is_err());
        assert_eq!(mem.len(), 8);
        assert_eq!(mem.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn slice_memory_shares_bounds_rules() -> Result<(), AbiError> {
        let mut raw = [0u8; 8];
        let mut mem: &mut [u8] = &mut raw;
        mem.write(0, b"abc")?;
        assert_eq!(mem.read(0, 3)?, b"abc");
        assert!(mem.read(7, 2).is_err());
        assert_eq!(mem.size(), 8);
        Ok(())
    }

    #[test]
    fn clear_zeroes_region() -> Result<(), AbiError> {
        let mut mem = LinearMemory::from_bytes(vec![9; 6]);
        mem.clear(1, 4)?;
        assert_eq!(mem.into_bytes(), vec![9, 0, 0, 0, 0, 9]);
        Ok(())
    }

    #[test]
    fn oversized_clear_fails_without_touching_memory() {
        let mut mem = LinearMemory::from_bytes(vec![7; 8]);
        assert_eq!(
            mem.clear(0, u32::MAX),
            Err(AbiError::MemoryWrite {
                offset: 0,
                len: u32::MAX,
                memory_size: 8
            })
        );
        assert!(mem.clear(6, 4).is_err());
        assert_eq!(mem.as_bytes(), &[7; 8]);
    }
}
