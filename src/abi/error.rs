//! Error types recorded while lifting and lowering values.

use thiserror::Error;

use super::Addr;

/// Errors that can occur while a value crosses the guest boundary.
///
/// None of these abort a call. The first one is kept on the
/// [`Store`](super::Store) and inspected after the call completes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("Memory read out of bounds: offset {offset} with length {len} exceeds memory size {memory_size}")]
    MemoryRead {
        offset: Addr,
        len: u32,
        memory_size: usize,
    },

    #[error("Memory write out of bounds: offset {offset} with length {len} exceeds memory size {memory_size}")]
    MemoryWrite {
        offset: Addr,
        len: u32,
        memory_size: usize,
    },

    #[error("Host reference {handle} is not found")]
    RefNotFound { handle: u32 },

    #[error("Host reference {handle} does not hold a value of type {expected}")]
    RefCast { handle: u32, expected: &'static str },

    #[error("Stack underflow: popped more slots than the caller pushed")]
    StackUnderflow,

    #[error("Invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: Addr },
}

impl AbiError {
    /// Returns `true` for out-of-bounds memory access, i.e. bad guest pointers.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::MemoryRead { .. } | Self::MemoryWrite { .. })
    }

    /// Returns `true` for reference table failures.
    ///
    /// [`AbiError::RefCast`] signals a host registration bug rather than bad
    /// guest data.
    pub fn is_ref(&self) -> bool {
        matches!(self, Self::RefNotFound { .. } | Self::RefCast { .. })
    }
}
