//! Wire model shared by every codec: slot kinds, the capability traits,
//! and the per-call [`Store`].
//!
//! A guest talks to the host through two channels: a LIFO stack of raw
//! 64-bit cells and a flat, bounds-checked linear memory. Every wire type
//! declares the ordered slot kinds it occupies on the stack ([`Value`]) and
//! may know how to read itself out of a call ([`Lift`]) or write itself into
//! one ([`Lower`]). Types that can also live inside linear memory (list
//! elements, result payloads) implement [`MemoryLift`] / [`MemoryLower`].
//!
//! # Module Organization
//!
//! - [`error`]: Non-fatal errors recorded on the store
//! - [`memory`]: The linear memory contract and a bounded in-process memory
//! - [`stack`]: The operand stack contract and a vector-backed stack
//! - [`store`]: The per-invocation call context
//! - `buffer`: Little-endian field helpers

mod buffer;
mod error;
mod memory;
mod stack;
mod store;

pub use error::AbiError;
pub use memory::{LinearMemory, Memory};
pub use stack::{SliceStack, Stack};
pub use store::Store;

pub(crate) use buffer::{read_u32_le, u32_pair_le};

/// A raw stack cell.
pub type Raw = u64;

/// An offset into the guest's linear memory.
pub type Addr = u32;

/// Size in bytes of a `(pointer, length)` header as stored in linear memory.
pub const POINTER_PAIR_SIZE: u32 = 8;

/// Wire slot kind, identified by the WebAssembly binary type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    /// 32-bit integer.
    I32 = 0x7f,
    /// 64-bit integer.
    I64 = 0x7e,
    /// 32-bit IEEE-754 float.
    F32 = 0x7d,
    /// 64-bit IEEE-754 float.
    F64 = 0x7c,
    /// Opaque external reference. Most guest toolchains cannot produce it,
    /// so no codec in this crate declares it.
    ExternRef = 0x6f,
}

impl ValueType {
    /// The numeric type tag used by the WebAssembly binary format.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A type with a statically known stack footprint.
pub trait Value {
    /// Ordered slot kinds this type occupies on the stack.
    fn value_types() -> Vec<ValueType>;

    /// Number of stack slots this type occupies.
    fn slot_count() -> usize {
        Self::value_types().len()
    }
}

/// Reads a typed value out of a call.
///
/// Implementations consume exactly the slots declared by
/// [`Value::value_types`], in reverse order since the stack is LIFO.
pub trait Lift: Value + Sized {
    fn lift(store: &mut Store<'_>) -> Self;
}

/// Writes a typed value into a call.
///
/// Implementations push exactly the slots declared by
/// [`Value::value_types`], in declaration order.
pub trait Lower: Value {
    fn lower(self, store: &mut Store<'_>);
}

/// Marker for types that travel symmetrically in both directions.
pub trait LiftLower: Lift + Lower {}

impl<T: Lift + Lower> LiftLower for T {}

/// A type with a fixed footprint inside linear memory.
pub trait MemoryValue {
    /// Bytes occupied at the value's own offset. Variable-length payloads
    /// (string bytes, list elements) live out of line and are not counted.
    const SIZE: u32;
}

/// Reads a value stored in linear memory at a given offset.
pub trait MemoryLift: MemoryValue + Sized {
    fn lift_memory(store: &mut Store<'_>, offset: Addr) -> Self;
}

/// Writes a value into linear memory.
pub trait MemoryLower: MemoryValue {
    /// Writes the fixed part at `offset` and any out-of-line payload starting
    /// at `data_ptr`. Returns the number of bytes written at `data_ptr`.
    fn lower_memory(&self, store: &mut Store<'_>, offset: Addr, data_ptr: Addr) -> u32;
}

/// Concatenates the slot kinds of several values, in order.
pub fn merge_value_types(groups: &[Vec<ValueType>]) -> Vec<ValueType> {
    groups.iter().flatten().copied().collect()
}
