//! Integer codecs.

use crate::abi::{Lift, Lower, Raw, Store, Value, ValueType};

macro_rules! impl_int32 {
    ($($ty:ty),*) => {
        $(
            impl Value for $ty {
                fn value_types() -> Vec<ValueType> {
                    vec![ValueType::I32]
                }
            }

            impl Lift for $ty {
                fn lift(store: &mut Store<'_>) -> Self {
                    store.pop() as $ty
                }
            }

            impl Lower for $ty {
                fn lower(self, store: &mut Store<'_>) {
                    store.push(Raw::from(self as u32));
                }
            }
        )*
    };
}

macro_rules! impl_int64 {
    ($($ty:ty),*) => {
        $(
            impl Value for $ty {
                fn value_types() -> Vec<ValueType> {
                    vec![ValueType::I64]
                }
            }

            impl Lift for $ty {
                fn lift(store: &mut Store<'_>) -> Self {
                    store.pop() as $ty
                }
            }

            impl Lower for $ty {
                fn lower(self, store: &mut Store<'_>) {
                    store.push(self as Raw);
                }
            }
        )*
    };
}

impl_int32!(i8, i16, i32, u8, u16, u32);
impl_int64!(i64, u64, isize, usize);

super::impl_memory_scalar!(i8, i16, i32, i64, u8, u16, u32, u64);
