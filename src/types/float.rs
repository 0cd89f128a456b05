//! Float and complex codecs. Slots hold the raw IEEE-754 bits; nothing is
//! rounded or converted.

use crate::abi::{Lift, Lower, Raw, Store, Value, ValueType};

impl Value for f32 {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::F32]
    }
}

impl Lift for f32 {
    fn lift(store: &mut Store<'_>) -> Self {
        f32::from_bits(store.pop() as u32)
    }
}

impl Lower for f32 {
    fn lower(self, store: &mut Store<'_>) {
        store.push(Raw::from(self.to_bits()));
    }
}

impl Value for f64 {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::F64]
    }
}

impl Lift for f64 {
    fn lift(store: &mut Store<'_>) -> Self {
        f64::from_bits(store.pop())
    }
}

impl Lower for f64 {
    fn lower(self, store: &mut Store<'_>) {
        store.push(self.to_bits());
    }
}

super::impl_memory_scalar!(f32, f64);

/// A complex number with 32-bit parts, in two F32 slots.
///
/// Lowering pushes the imaginary part first and the real part second, so
/// lifting pops the real part first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

/// A complex number with 64-bit parts, in two F64 slots.
///
/// Same slot order as [`Complex64`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

macro_rules! impl_complex {
    ($name:ident, $part:ty, $slot:expr) => {
        impl $name {
            pub fn new(re: $part, im: $part) -> Self {
                Self { re, im }
            }
        }

        impl Value for $name {
            fn value_types() -> Vec<ValueType> {
                vec![$slot, $slot]
            }
        }

        impl Lift for $name {
            fn lift(store: &mut Store<'_>) -> Self {
                let re = <$part>::lift(store);
                let im = <$part>::lift(store);
                Self { re, im }
            }
        }

        impl Lower for $name {
            fn lower(self, store: &mut Store<'_>) {
                self.im.lower(store);
                self.re.lower(store);
            }
        }
    };
}

impl_complex!(Complex64, f32, ValueType::F32);
impl_complex!(Complex128, f64, ValueType::F64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::SliceStack;

    #[test]
    fn float_is_a_bitcast() {
        let mut stack = SliceStack::new();
        let mut store = Store::new(&mut stack);
        f32::NAN.lower(&mut store);
        assert_eq!(store.pop(), u64::from(f32::NAN.to_bits()));

        store.push(0x7ff8_0000_0000_0001);
        let payload_nan = f64::lift(&mut store);
        payload_nan.lower(&mut store);
        assert_eq!(store.pop(), 0x7ff8_0000_0000_0001);
    }

    #[test]
    fn complex_pushes_imaginary_first() {
        let mut stack = SliceStack::new();
        let mut store = Store::new(&mut stack);
        Complex128::new(1.5, -2.0).lower(&mut store);
        assert_eq!(store.stack_len(), 2);

        // real part sits on top of the stack
        assert_eq!(store.pop(), 1.5f64.to_bits());
        assert_eq!(store.pop(), (-2.0f64).to_bits());
    }

    #[test]
    fn complex_round_trips() {
        let mut stack = SliceStack::new();
        let mut store = Store::new(&mut stack);
        let value = Complex64::new(3.25, 0.5);
        value.lower(&mut store);
        assert_eq!(Complex64::lift(&mut store), value);
        assert_eq!(store.stack_len(), 0);
        assert_eq!(
            Complex64::value_types(),
            vec![ValueType::F32, ValueType::F32]
        );
    }
}
