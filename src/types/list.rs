//! Homogeneous lists in linear memory.
//!
//! Elements are packed back to back at their natural width, little-endian,
//! with no padding. Elements with an out-of-line payload (strings, nested
//! lists) are written as a header region of `count * SIZE` bytes followed
//! immediately by the concatenated payloads, so a list of strings is an
//! array of `(pointer, length)` pairs followed by the string bytes.
//!
//! [`List`] travels on the stack as `(offset, count)`. [`ReturnedList`]
//! travels as a single pointer to an 8-byte `(data_ptr, count)` header, for
//! call shapes where the guest can only receive one pointer.

use crate::abi::{
    AbiError, Addr, Lift, Lower, MemoryLift, MemoryLower, MemoryValue, POINTER_PAIR_SIZE, Raw,
    Store, Value, ValueType,
};

use super::mem::{read_header, write_header};

/// Lift `count` elements stored at `offset`.
///
/// The whole element region is bounds-checked first, so a hostile count
/// fails fast with an empty list instead of decoding garbage. A region that
/// runs past the 32-bit address space is out of bounds whatever the
/// memory size.
fn lift_elements<T: MemoryLift>(store: &mut Store<'_>, offset: Addr, count: u32) -> Vec<T> {
    if count == 0 {
        return Vec::new();
    }
    let total = count.checked_mul(T::SIZE);
    let last = total.and_then(|total| offset.checked_add(total.saturating_sub(1)));
    let (Some(total), Some(_)) = (total, last) else {
        store.fail(AbiError::MemoryRead {
            offset,
            len: total.unwrap_or(u32::MAX),
            memory_size: store.memory_size(),
        });
        return Vec::new();
    };
    if !store.check_read(offset, total) {
        return Vec::new();
    }
    // the region's last byte is addressable, so no element address wraps
    (0..count)
        .map(|i| T::lift_memory(store, offset + i * T::SIZE))
        .collect()
}

/// Lower `items` at `offset`, with out-of-line payloads right after the
/// element region. Returns the total number of bytes written.
fn lower_elements<T: MemoryLower>(store: &mut Store<'_>, offset: Addr, items: &[T]) -> u32 {
    let header_len = (items.len() as u32).saturating_mul(T::SIZE);
    let mut data_ptr = offset.saturating_add(header_len);
    let mut elem = offset;
    for item in items {
        let written = item.lower_memory(store, elem, data_ptr);
        data_ptr = data_ptr.saturating_add(written);
        elem = elem.saturating_add(T::SIZE);
    }
    data_ptr - offset
}

/// A list passed as `(offset, count)` in two I32 slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List<T> {
    pub offset: Addr,
    pub raw: Vec<T>,
}

/// A list of strings: `(pointer, length)` pairs followed by the string bytes.
pub type ListStrings = List<String>;

impl<T> List<T> {
    pub fn new(offset: Addr, raw: Vec<T>) -> Self {
        Self { offset, raw }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.raw
    }

    pub fn into_inner(self) -> Vec<T> {
        self.raw
    }
}

impl<T> Value for List<T> {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I32, ValueType::I32]
    }
}

impl<T: MemoryLift> Lift for List<T> {
    fn lift(store: &mut Store<'_>) -> Self {
        let count = store.pop() as u32;
        let offset = store.pop() as u32;
        let raw = lift_elements(store, offset, count);
        Self { offset, raw }
    }
}

impl<T: MemoryLower> Lower for List<T> {
    fn lower(self, store: &mut Store<'_>) {
        lower_elements(store, self.offset, &self.raw);
        store.push(Raw::from(self.offset));
        store.push(self.raw.len() as Raw);
    }
}

impl<T> MemoryValue for List<T> {
    const SIZE: u32 = POINTER_PAIR_SIZE;
}

impl<T: MemoryLift> MemoryLift for List<T> {
    fn lift_memory(store: &mut Store<'_>, offset: Addr) -> Self {
        let (ptr, count) = read_header(store, offset);
        let raw = lift_elements(store, ptr, count);
        Self { offset: ptr, raw }
    }
}

impl<T: MemoryLower> MemoryLower for List<T> {
    fn lower_memory(&self, store: &mut Store<'_>, offset: Addr, data_ptr: Addr) -> u32 {
        let written = lower_elements(store, data_ptr, &self.raw);
        write_header(store, offset, data_ptr, self.raw.len() as u32);
        written
    }
}

/// A list returned through a single I32 pointer.
///
/// Lowering writes the elements at `data_ptr` and an 8-byte
/// `(data_ptr, count)` header at `offset`, then pushes `offset`. Lifting pops
/// the header pointer and follows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnedList<T> {
    pub offset: Addr,
    pub data_ptr: Addr,
    pub raw: Vec<T>,
}

impl<T> ReturnedList<T> {
    pub fn new(offset: Addr, data_ptr: Addr, raw: Vec<T>) -> Self {
        Self {
            offset,
            data_ptr,
            raw,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.raw
    }

    pub fn into_inner(self) -> Vec<T> {
        self.raw
    }
}

impl<T> Value for ReturnedList<T> {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I32]
    }
}

impl<T: MemoryLift> Lift for ReturnedList<T> {
    fn lift(store: &mut Store<'_>) -> Self {
        let offset = store.pop() as u32;
        let (data_ptr, count) = read_header(store, offset);
        let raw = lift_elements(store, data_ptr, count);
        Self {
            offset,
            data_ptr,
            raw,
        }
    }
}

impl<T: MemoryLower> Lower for ReturnedList<T> {
    fn lower(self, store: &mut Store<'_>) {
        lower_elements(store, self.data_ptr, &self.raw);
        write_header(store, self.offset, self.data_ptr, self.raw.len() as u32);
        store.push(Raw::from(self.offset));
    }
}
