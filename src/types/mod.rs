//! Wire codecs for concrete types.
//!
//! Scalars are stack-only: integers, floats, `bool`, complex pairs,
//! durations and timestamps each occupy one or two slots. Memory-backed
//! types ([`Bytes`], [`Text`], [`List`], [`ReturnedList`], [`ResultValue`])
//! push pointers on the stack and keep their payload in linear memory.
//!
//! Integers of 32 bits or less use one I32 slot and are lowered as the
//! zero-extended 32-bit pattern, matching how VMs encode `i32` cells. Wider
//! and pointer-sized integers use one I64 slot. No range checks are done:
//! lifting truncates to the target width.

mod float;
mod int;
mod list;
mod mem;
mod misc;
mod result;

pub use float::{Complex64, Complex128};
pub use list::{List, ListStrings, ReturnedList};
pub use mem::{Bytes, Text};
pub use result::{DISCRIMINANT_SIZE, ResultValue};

/// Implements the memory codecs for fixed-width little-endian scalars.
macro_rules! impl_memory_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::abi::MemoryValue for $ty {
                const SIZE: u32 = ::std::mem::size_of::<$ty>() as u32;
            }

            impl $crate::abi::MemoryLift for $ty {
                fn lift_memory(store: &mut $crate::abi::Store<'_>, offset: $crate::abi::Addr) -> Self {
                    store
                        .read(offset, <$ty as $crate::abi::MemoryValue>::SIZE)
                        .and_then(|bytes| bytes.as_slice().try_into().ok())
                        .map(<$ty>::from_le_bytes)
                        .unwrap_or_default()
                }
            }

            impl $crate::abi::MemoryLower for $ty {
                fn lower_memory(
                    &self,
                    store: &mut $crate::abi::Store<'_>,
                    offset: $crate::abi::Addr,
                    _data_ptr: $crate::abi::Addr,
                ) -> u32 {
                    store.write(offset, &self.to_le_bytes());
                    0
                }
            }
        )*
    };
}

pub(crate) use impl_memory_scalar;
