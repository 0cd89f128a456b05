//! Byte buffers and strings passed through linear memory.
//!
//! On the stack both occupy two I32 slots, `(offset, length)`, with the
//! length on top. Inside memory (as a list element or result payload) they
//! are an 8-byte `(pointer, length)` header whose payload lives out of line.
//!
//! The guest owns its memory, so lowering needs a destination offset
//! obtained from the guest (an explicit argument or a call to its
//! allocator). [`Bytes`] and [`Text`] carry that offset; plain `Vec<u8>` and
//! `String` can only be lifted from the stack.

use crate::abi::{
    AbiError, Addr, Lift, Lower, MemoryLift, MemoryLower, MemoryValue, POINTER_PAIR_SIZE, Raw,
    Store, Value, ValueType, u32_pair_le,
};

fn pop_region(store: &mut Store<'_>) -> (Addr, u32) {
    let len = store.pop() as u32;
    let offset = store.pop() as u32;
    (offset, len)
}

/// Read the `(pointer, length)` header at `offset`.
pub(crate) fn read_header(store: &mut Store<'_>, offset: Addr) -> (Addr, u32) {
    let ptr = store.read_u32(offset);
    let len = store.read_u32(offset.saturating_add(4));
    (ptr, len)
}

pub(crate) fn write_header(store: &mut Store<'_>, offset: Addr, ptr: Addr, len: u32) {
    store.write(offset, &u32_pair_le(ptr, len));
}

fn read_payload(store: &mut Store<'_>, offset: Addr, len: u32) -> Vec<u8> {
    store.read(offset, len).unwrap_or_default()
}

fn decode_utf8(store: &mut Store<'_>, offset: Addr, raw: Vec<u8>) -> String {
    match String::from_utf8(raw) {
        Ok(text) => text,
        Err(err) => {
            store.fail(AbiError::InvalidUtf8 { offset });
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

fn lower_region(store: &mut Store<'_>, offset: Addr, payload: &[u8]) {
    store.write(offset, payload);
    store.push(Raw::from(offset));
    store.push(payload.len() as Raw);
}

fn lower_out_of_line(store: &mut Store<'_>, offset: Addr, data_ptr: Addr, payload: &[u8]) -> u32 {
    let len = payload.len() as u32;
    store.write(data_ptr, payload);
    write_header(store, offset, data_ptr, len);
    len
}

/// A byte buffer together with its location in linear memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytes {
    pub offset: Addr,
    pub raw: Vec<u8>,
}

impl Bytes {
    pub fn new(offset: Addr, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            raw: raw.into(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.raw
    }
}

impl Value for Bytes {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I32, ValueType::I32]
    }
}

impl Lift for Bytes {
    fn lift(store: &mut Store<'_>) -> Self {
        let (offset, len) = pop_region(store);
        let raw = read_payload(store, offset, len);
        Self { offset, raw }
    }
}

impl Lower for Bytes {
    fn lower(self, store: &mut Store<'_>) {
        lower_region(store, self.offset, &self.raw);
    }
}

impl MemoryValue for Bytes {
    const SIZE: u32 = POINTER_PAIR_SIZE;
}

impl MemoryLift for Bytes {
    fn lift_memory(store: &mut Store<'_>, offset: Addr) -> Self {
        let (ptr, len) = read_header(store, offset);
        let raw = read_payload(store, ptr, len);
        Self { offset: ptr, raw }
    }
}

impl MemoryLower for Bytes {
    fn lower_memory(&self, store: &mut Store<'_>, offset: Addr, data_ptr: Addr) -> u32 {
        lower_out_of_line(store, offset, data_ptr, &self.raw)
    }
}

/// A UTF-8 string together with its location in linear memory.
///
/// Invalid UTF-8 from the guest is decoded lossily and recorded as
/// [`AbiError::InvalidUtf8`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub offset: Addr,
    pub raw: String,
}

impl Text {
    pub fn new(offset: Addr, raw: impl Into<String>) -> Self {
        Self {
            offset,
            raw: raw.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_inner(self) -> String {
        self.raw
    }
}

impl Value for Text {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I32, ValueType::I32]
    }
}

impl Lift for Text {
    fn lift(store: &mut Store<'_>) -> Self {
        let (offset, len) = pop_region(store);
        let bytes = read_payload(store, offset, len);
        let raw = decode_utf8(store, offset, bytes);
        Self { offset, raw }
    }
}

impl Lower for Text {
    fn lower(self, store: &mut Store<'_>) {
        lower_region(store, self.offset, self.raw.as_bytes());
    }
}

impl MemoryValue for Text {
    const SIZE: u32 = POINTER_PAIR_SIZE;
}

impl MemoryLift for Text {
    fn lift_memory(store: &mut Store<'_>, offset: Addr) -> Self {
        let (ptr, len) = read_header(store, offset);
        let bytes = read_payload(store, ptr, len);
        let raw = decode_utf8(store, ptr, bytes);
        Self { offset: ptr, raw }
    }
}

impl MemoryLower for Text {
    fn lower_memory(&self, store: &mut Store<'_>, offset: Addr, data_ptr: Addr) -> u32 {
        lower_out_of_line(store, offset, data_ptr, self.raw.as_bytes())
    }
}

impl Value for Vec<u8> {
    fn value_types() -> Vec<ValueType> {
        Bytes::value_types()
    }
}

impl Lift for Vec<u8> {
    fn lift(store: &mut Store<'_>) -> Self {
        Bytes::lift(store).raw
    }
}

impl MemoryValue for Vec<u8> {
    const SIZE: u32 = POINTER_PAIR_SIZE;
}

impl MemoryLift for Vec<u8> {
    fn lift_memory(store: &mut Store<'_>, offset: Addr) -> Self {
        Bytes::lift_memory(store, offset).raw
    }
}

impl MemoryLower for Vec<u8> {
    fn lower_memory(&self, store: &mut Store<'_>, offset: Addr, data_ptr: Addr) -> u32 {
        lower_out_of_line(store, offset, data_ptr, self)
    }
}

impl Value for String {
    fn value_types() -> Vec<ValueType> {
        Text::value_types()
    }
}

impl Lift for String {
    fn lift(store: &mut Store<'_>) -> Self {
        Text::lift(store).raw
    }
}

impl MemoryValue for String {
    const SIZE: u32 = POINTER_PAIR_SIZE;
}

impl MemoryLift for String {
    fn lift_memory(store: &mut Store<'_>, offset: Addr) -> Self {
        Text::lift_memory(store, offset).raw
    }
}

impl MemoryLower for String {
    fn lower_memory(&self, store: &mut Store<'_>, offset: Addr, data_ptr: Addr) -> u32 {
        lower_out_of_line(store, offset, data_ptr, self.as_bytes())
    }
}
