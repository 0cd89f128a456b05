//! Tagged success/error results in linear memory.

use crate::abi::{Addr, Lift, Lower, MemoryLift, MemoryLower, MemoryValue, Raw, Store, Value, ValueType};

/// Size of the result discriminant preceding the payload.
pub const DISCRIMINANT_SIZE: u32 = 4;

/// A result passed through a single I32 pointer.
///
/// Memory layout at `offset`: a little-endian u32 discriminant (0 for `Ok`,
/// anything else for `Err`) immediately followed by the payload's memory
/// form at `offset + 4`. Out-of-line payload bytes (strings, list elements)
/// go to `data_ptr`. Only the active branch is written.
///
/// The two branches may have different footprints, and nothing clears the
/// bytes the other branch left behind. Callers that reuse one region across
/// calls with different outcomes must zero it first (see
/// [`LinearMemory::clear`](crate::abi::LinearMemory::clear)).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultValue<T, E> {
    pub offset: Addr,
    pub data_ptr: Addr,
    pub value: Result<T, E>,
}

impl<T, E> ResultValue<T, E> {
    pub fn ok(offset: Addr, data_ptr: Addr, value: T) -> Self {
        Self {
            offset,
            data_ptr,
            value: Ok(value),
        }
    }

    pub fn err(offset: Addr, data_ptr: Addr, error: E) -> Self {
        Self {
            offset,
            data_ptr,
            value: Err(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.value.is_err()
    }

    pub fn into_inner(self) -> Result<T, E> {
        self.value
    }
}

impl<T: MemoryLift, E: MemoryLift> ResultValue<T, E> {
    fn lift_at(store: &mut Store<'_>, offset: Addr) -> Result<T, E> {
        let discriminant = store.read_u32(offset);
        let payload = offset.saturating_add(DISCRIMINANT_SIZE);
        if discriminant == 0 {
            Ok(T::lift_memory(store, payload))
        } else {
            Err(E::lift_memory(store, payload))
        }
    }
}

impl<T: MemoryLower, E: MemoryLower> ResultValue<T, E> {
    fn lower_at(&self, store: &mut Store<'_>, offset: Addr, data_ptr: Addr) -> u32 {
        let payload = offset.saturating_add(DISCRIMINANT_SIZE);
        match &self.value {
            Ok(value) => {
                store.write_u32(offset, 0);
                value.lower_memory(store, payload, data_ptr)
            }
            Err(error) => {
                store.write_u32(offset, 1);
                error.lower_memory(store, payload, data_ptr)
            }
        }
    }
}

impl<T, E> Value for ResultValue<T, E> {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I32]
    }
}

impl<T: MemoryLift, E: MemoryLift> Lift for ResultValue<T, E> {
    fn lift(store: &mut Store<'_>) -> Self {
        let offset = store.pop() as u32;
        let value = Self::lift_at(store, offset);
        Self {
            offset,
            data_ptr: 0,
            value,
        }
    }
}

impl<T: MemoryLower, E: MemoryLower> Lower for ResultValue<T, E> {
    fn lower(self, store: &mut Store<'_>) {
        self.lower_at(store, self.offset, self.data_ptr);
        store.push(Raw::from(self.offset));
    }
}

impl<T: MemoryValue, E: MemoryValue> MemoryValue for ResultValue<T, E> {
    const SIZE: u32 = DISCRIMINANT_SIZE + if T::SIZE > E::SIZE { T::SIZE } else { E::SIZE };
}

impl<T: MemoryLift, E: MemoryLift> MemoryLift for ResultValue<T, E> {
    fn lift_memory(store: &mut Store<'_>, offset: Addr) -> Self {
        let value = Self::lift_at(store, offset);
        Self {
            offset,
            data_ptr: 0,
            value,
        }
    }
}

impl<T: MemoryLower, E: MemoryLower> MemoryLower for ResultValue<T, E> {
    fn lower_memory(&self, store: &mut Store<'_>, offset: Addr, data_ptr: Addr) -> u32 {
        self.lower_at(store, offset, data_ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{LinearMemory, SliceStack};

    #[test]
    fn discriminant_precedes_payload() {
        let mut stack = SliceStack::new();
        let mut memory = LinearMemory::new(16);
        {
            let mut store = Store::new(&mut stack).with_memory(&mut memory);
            ResultValue::<u32, u8>::err(4, 0, 9).lower(&mut store);
            assert_eq!(store.pop(), 4);
        }
        assert_eq!(memory.as_bytes().get(4..9), Some(&[1, 0, 0, 0, 9][..]));
    }

    #[test]
    fn any_nonzero_discriminant_is_error() {
        let mut stack = SliceStack::from(vec![0]);
        let mut memory = LinearMemory::from_bytes(vec![7, 0, 0, 0, 5, 0]);
        let mut store = Store::new(&mut stack).with_memory(&mut memory);
        let lifted = ResultValue::<u32, u16>::lift(&mut store);
        assert_eq!(lifted.value, Err(5));
    }

    #[test]
    fn size_covers_larger_branch() {
        assert_eq!(<ResultValue<u8, String> as MemoryValue>::SIZE, 12);
        assert_eq!(<ResultValue<u64, bool> as MemoryValue>::SIZE, 12);
    }

    #[test]
    fn stale_bytes_survive_a_smaller_branch() {
        let mut stack = SliceStack::new();
        let mut memory = LinearMemory::new(16);
        let mut store = Store::new(&mut stack).with_memory(&mut memory);
        ResultValue::<u64, u8>::ok(0, 0, u64::MAX).lower(&mut store);
        ResultValue::<u64, u8>::err(0, 0, 1).lower(&mut store);
        store.pop();
        store.pop();
        // the error branch rewrote one payload byte; the rest are stale
        assert_eq!(store.read(5, 7), Some(vec![0xff; 7]));
    }
}
