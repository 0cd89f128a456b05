//! The call context threaded through one host function invocation.

use super::{AbiError, Addr, Memory, Raw, Stack};
use crate::context::Context;
use crate::logging::trace;
use crate::refs::Refs;

/// Per-invocation access to the guest's runtime data.
///
/// The stack and memory are exclusively borrowed for the duration of one
/// call. The reference table is shared and may outlive the call.
///
/// Failures while lifting or lowering never abort: the first one is kept as
/// a sticky error and the codec carries on with a zero or truncated value.
///
/// # Example
///
/// ```ignore
/// use wasm_host_abi::{LinearMemory, SliceStack, Store};
///
/// let mut stack = SliceStack::new();
/// let mut memory = LinearMemory::new(1024);
/// let mut store = Store::new(&mut stack).with_memory(&mut memory);
/// host_func.call(&mut store);
/// if let Some(err) = store.take_error() {
///     // decide whether the call should be treated as failed
/// }
/// ```
pub struct Store<'a> {
    stack: &'a mut dyn Stack,
    memory: Option<&'a mut dyn Memory>,
    refs: Option<&'a dyn Refs>,
    context: Context,
    error: Option<AbiError>,
}

impl<'a> Store<'a> {
    /// Create a store over a stack, without memory or references.
    pub fn new(stack: &'a mut dyn Stack) -> Self {
        Self {
            stack,
            memory: None,
            refs: None,
            context: Context::default(),
            error: None,
        }
    }

    pub fn with_memory(mut self, memory: &'a mut dyn Memory) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_refs(mut self, refs: &'a dyn Refs) -> Self {
        self.refs = Some(refs);
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn push(&mut self, value: Raw) {
        self.stack.push(value);
    }

    /// Pop one cell. An empty stack records [`AbiError::StackUnderflow`]
    /// and yields 0.
    pub fn pop(&mut self) -> Raw {
        match self.stack.pop() {
            Some(value) => value,
            None => {
                self.fail(AbiError::StackUnderflow);
                0
            }
        }
    }

    /// Number of cells currently on the stack.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Copy `len` bytes out of memory. Returns `None` and records
    /// [`AbiError::MemoryRead`] when out of bounds or when the call has no
    /// memory.
    pub fn read(&mut self, offset: Addr, len: u32) -> Option<Vec<u8>> {
        let result = self.borrow_bytes(offset, len).map(<[u8]>::to_vec);
        match result {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                self.fail(err);
                None
            }
        }
    }

    /// Bounds-check a region without copying it. Records
    /// [`AbiError::MemoryRead`] and returns `false` like [`Store::read`].
    pub fn check_read(&mut self, offset: Addr, len: u32) -> bool {
        let result = self.borrow_bytes(offset, len).map(|_| ());
        match result {
            Ok(()) => true,
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    fn borrow_bytes(&self, offset: Addr, len: u32) -> Result<&[u8], AbiError> {
        match self.memory.as_deref() {
            Some(memory) => memory.read(offset, len),
            None => Err(AbiError::MemoryRead {
                offset,
                len,
                memory_size: 0,
            }),
        }
    }

    /// Size of the attached memory in bytes, 0 without one.
    pub fn memory_size(&self) -> usize {
        self.memory.as_deref().map_or(0, Memory::size)
    }

    /// Read a little-endian u32, yielding 0 when out of bounds.
    pub fn read_u32(&mut self, offset: Addr) -> u32 {
        self.read(offset, 4)
            .map(|bytes| super::read_u32_le(&bytes))
            .unwrap_or(0)
    }

    /// Copy `bytes` into memory. Returns `false` and records
    /// [`AbiError::MemoryWrite`] when out of bounds.
    pub fn write(&mut self, offset: Addr, bytes: &[u8]) -> bool {
        let result = match self.memory.as_deref_mut() {
            Some(memory) => memory.write(offset, bytes),
            None => Err(AbiError::MemoryWrite {
                offset,
                len: bytes.len() as u32,
                memory_size: 0,
            }),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    pub fn write_u32(&mut self, offset: Addr, value: u32) -> bool {
        self.write(offset, &value.to_le_bytes())
    }

    pub fn refs(&self) -> Option<&'a dyn Refs> {
        self.refs
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Record an error unless one is already recorded.
    pub fn fail(&mut self, err: AbiError) {
        trace!(error = %err, "abi error recorded");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// The first error recorded during this call, if any.
    pub fn error(&self) -> Option<&AbiError> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Take the recorded error, clearing it.
    pub fn take_error(&mut self) -> Option<AbiError> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{LinearMemory, SliceStack};

    #[test]
    fn first_error_is_sticky() {
        let mut stack = SliceStack::new();
        let mut store = Store::new(&mut stack);
        assert_eq!(store.pop(), 0);
        store.fail(AbiError::RefNotFound { handle: 3 });
        assert_eq!(store.error(), Some(&AbiError::StackUnderflow));
        assert_eq!(store.take_error(), Some(AbiError::StackUnderflow));
        assert!(!store.has_error());
    }

    #[test]
    fn missing_memory_reads_as_out_of_bounds() {
        let mut stack = SliceStack::new();
        let mut store = Store::new(&mut stack);
        assert_eq!(store.read(0, 1), None);
        assert!(store.error().is_some_and(AbiError::is_memory));
    }

    #[test]
    fn out_of_bounds_read_leaves_memory_intact() {
        let mut stack = SliceStack::new();
        let mut memory = LinearMemory::new(32);
        let mut store = Store::new(&mut stack).with_memory(&mut memory);
        assert!(store.write(0, b"keep"));
        assert_eq!(store.read(40, 10), None);
        assert_eq!(
            store.error(),
            Some(&AbiError::MemoryRead {
                offset: 40,
                len: 10,
                memory_size: 32
            })
        );
        assert_eq!(store.read(0, 4), Some(b"keep".to_vec()));
    }

    #[test]
    fn check_read_reports_like_read() {
        let mut stack = SliceStack::new();
        let mut memory = LinearMemory::new(16);
        let mut store = Store::new(&mut stack).with_memory(&mut memory);
        assert!(store.check_read(0, 16));
        assert!(!store.has_error());
        assert!(!store.check_read(12, 8));
        assert_eq!(
            store.error(),
            Some(&AbiError::MemoryRead {
                offset: 12,
                len: 8,
                memory_size: 16
            })
        );
    }

    #[test]
    fn out_of_bounds_write_is_recorded() {
        let mut stack = SliceStack::new();
        let mut memory = LinearMemory::new(8);
        let mut store = Store::new(&mut stack).with_memory(&mut memory);
        assert!(!store.write_u32(6, 1));
        assert_eq!(store.read_u32(6), 0);
        assert!(matches!(store.error(), Some(AbiError::MemoryWrite { .. })));
    }
}
