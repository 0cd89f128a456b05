//! Property-based tests for scalar codec roundtrip correctness.
//!
//! These tests verify that lift(lower(x)) == x for random inputs and that
//! every codec pushes exactly the slots it declares.

use std::time::{Duration, UNIX_EPOCH};

use proptest::prelude::*;
use wasm_host_abi::{Complex64, Complex128, Lift, Lower, SliceStack, Store, Value};

/// Lower a value onto a fresh stack and lift it back.
fn roundtrip<T: Lift + Lower>(value: T) -> (T, usize, bool) {
    let mut stack = SliceStack::new();
    let mut store = Store::new(&mut stack);
    value.lower(&mut store);
    let pushed = store.stack_len();
    let lifted = T::lift(&mut store);
    let clean = store.stack_len() == 0 && !store.has_error();
    (lifted, pushed, clean)
}

macro_rules! roundtrip_ints {
    ($($name:ident: $ty:ty),* $(,)?) => {
        proptest! {
            $(
                #[test]
                fn $name(val in any::<$ty>()) {
                    let (lifted, pushed, clean) = roundtrip(val);
                    prop_assert_eq!(lifted, val);
                    prop_assert_eq!(pushed, <$ty as Value>::slot_count());
                    prop_assert!(clean);
                }
            )*
        }
    };
}

roundtrip_ints! {
    roundtrip_i8: i8,
    roundtrip_i16: i16,
    roundtrip_i32: i32,
    roundtrip_i64: i64,
    roundtrip_u8: u8,
    roundtrip_u16: u16,
    roundtrip_u32: u32,
    roundtrip_u64: u64,
    roundtrip_isize: isize,
    roundtrip_usize: usize,
    roundtrip_bool: bool,
}

proptest! {
    #[test]
    fn small_ints_are_sign_extended_to_32_bits(val in any::<i16>()) {
        let mut stack = SliceStack::new();
        let mut store = Store::new(&mut stack);
        val.lower(&mut store);
        let slot = store.pop();
        prop_assert_eq!(slot, u64::from(i32::from(val) as u32));
        prop_assert_eq!(slot >> 32, 0);
    }

    #[test]
    fn roundtrip_f32_bits(bits in any::<u32>()) {
        let (lifted, pushed, clean) = roundtrip(f32::from_bits(bits));
        prop_assert_eq!(lifted.to_bits(), bits);
        prop_assert_eq!(pushed, 1);
        prop_assert!(clean);
    }

    #[test]
    fn roundtrip_f64_bits(bits in any::<u64>()) {
        let (lifted, _, clean) = roundtrip(f64::from_bits(bits));
        prop_assert_eq!(lifted.to_bits(), bits);
        prop_assert!(clean);
    }

    #[test]
    fn roundtrip_complex64(re in -1e6f32..1e6f32, im in -1e6f32..1e6f32) {
        let (lifted, pushed, clean) = roundtrip(Complex64::new(re, im));
        prop_assert_eq!(lifted, Complex64::new(re, im));
        prop_assert_eq!(pushed, 2);
        prop_assert!(clean);
    }

    #[test]
    fn roundtrip_complex128(re in any::<f64>(), im in any::<f64>()) {
        let (lifted, _, clean) = roundtrip(Complex128::new(re, im));
        prop_assert_eq!(lifted.re.to_bits(), re.to_bits());
        prop_assert_eq!(lifted.im.to_bits(), im.to_bits());
        prop_assert!(clean);
    }

    #[test]
    fn roundtrip_duration(nanos in any::<u64>()) {
        let (lifted, _, clean) = roundtrip(Duration::from_nanos(nanos));
        prop_assert_eq!(lifted, Duration::from_nanos(nanos));
        prop_assert!(clean);
    }

    #[test]
    fn roundtrip_whole_second_times(secs in -1_000_000_000i64..4_000_000_000i64) {
        let delta = Duration::from_secs(secs.unsigned_abs());
        let time = if secs >= 0 { UNIX_EPOCH + delta } else { UNIX_EPOCH - delta };
        let (lifted, pushed, clean) = roundtrip(time);
        prop_assert_eq!(lifted, time);
        prop_assert_eq!(pushed, 1);
        prop_assert!(clean);
    }

    #[test]
    fn roundtrip_pairs(left in any::<u8>(), right in any::<i64>()) {
        let (lifted, pushed, clean) = roundtrip((left, right));
        prop_assert_eq!(lifted, (left, right));
        prop_assert_eq!(pushed, 2);
        prop_assert!(clean);
    }
}

#[test]
fn complex_pushes_imaginary_first() {
    let mut stack = SliceStack::new();
    {
        let mut store = Store::new(&mut stack);
        Complex128::new(1.5, -2.5).lower(&mut store);
    }
    assert_eq!(
        stack.as_slice(),
        &[(-2.5f64).to_bits(), 1.5f64.to_bits()]
    );
}

#[test]
fn sub_second_times_floor() {
    let time = UNIX_EPOCH + Duration::from_millis(1_999);
    let (lifted, _, _) = roundtrip(time);
    assert_eq!(lifted, UNIX_EPOCH + Duration::from_secs(1));

    let before = UNIX_EPOCH - Duration::from_millis(500);
    let mut stack = SliceStack::new();
    let mut store = Store::new(&mut stack);
    before.lower(&mut store);
    assert_eq!(store.pop() as i64, -1);
}

#[test]
fn duration_is_one_i64_tick_count() {
    let mut stack = SliceStack::new();
    let mut store = Store::new(&mut stack);
    Duration::from_micros(3).lower(&mut store);
    assert_eq!(store.pop(), 3_000);
}
