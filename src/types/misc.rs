//! Booleans, unit, pairs, durations and timestamps.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::abi::{
    Addr, Lift, Lower, MemoryLift, MemoryLower, MemoryValue, Raw, Store, Value, ValueType,
};

impl Value for bool {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I32]
    }
}

impl Lift for bool {
    fn lift(store: &mut Store<'_>) -> Self {
        store.pop() != 0
    }
}

impl Lower for bool {
    fn lower(self, store: &mut Store<'_>) {
        store.push(Raw::from(self));
    }
}

impl MemoryValue for bool {
    const SIZE: u32 = 1;
}

impl MemoryLift for bool {
    fn lift_memory(store: &mut Store<'_>, offset: Addr) -> Self {
        store
            .read(offset, 1)
            .is_some_and(|bytes| bytes.iter().any(|b| *b != 0))
    }
}

impl MemoryLower for bool {
    fn lower_memory(&self, store: &mut Store<'_>, offset: Addr, _data_ptr: Addr) -> u32 {
        store.write(offset, &[u8::from(*self)]);
        0
    }
}

/// The "no result" type: occupies no slots.
impl Value for () {
    fn value_types() -> Vec<ValueType> {
        Vec::new()
    }
}

impl Lift for () {
    fn lift(_store: &mut Store<'_>) -> Self {}
}

impl Lower for () {
    fn lower(self, _store: &mut Store<'_>) {}
}

/// A pair occupies the slots of `L` followed by the slots of `R`. Nest pairs
/// to pass or return more values than a single adapter supports.
impl<L: Value, R: Value> Value for (L, R) {
    fn value_types() -> Vec<ValueType> {
        let mut types = L::value_types();
        types.extend(R::value_types());
        types
    }
}

impl<L: Lift, R: Lift> Lift for (L, R) {
    fn lift(store: &mut Store<'_>) -> Self {
        let right = R::lift(store);
        let left = L::lift(store);
        (left, right)
    }
}

impl<L: Lower, R: Lower> Lower for (L, R) {
    fn lower(self, store: &mut Store<'_>) {
        self.0.lower(store);
        self.1.lower(store);
    }
}

/// A duration as a raw nanosecond tick count in one I64 slot. Durations
/// beyond `u64::MAX` nanoseconds are truncated.
impl Value for Duration {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I64]
    }
}

impl Lift for Duration {
    fn lift(store: &mut Store<'_>) -> Self {
        Duration::from_nanos(store.pop())
    }
}

impl Lower for Duration {
    fn lower(self, store: &mut Store<'_>) {
        store.push(self.as_nanos() as Raw);
    }
}

/// A timestamp as signed Unix-epoch seconds in one I64 slot. Sub-second
/// precision is dropped.
impl Value for SystemTime {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I64]
    }
}

impl Lift for SystemTime {
    fn lift(store: &mut Store<'_>) -> Self {
        let secs = store.pop() as i64;
        let delta = Duration::from_secs(secs.unsigned_abs());
        let time = if secs >= 0 {
            UNIX_EPOCH.checked_add(delta)
        } else {
            UNIX_EPOCH.checked_sub(delta)
        };
        time.unwrap_or(UNIX_EPOCH)
    }
}

impl Lower for SystemTime {
    fn lower(self, store: &mut Store<'_>) {
        let secs = match self.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs() as i64,
            Err(before) => {
                let before = before.duration();
                // floor: half a second before the epoch is second -1
                let whole = before.as_secs() as i64;
                if before.subsec_nanos() > 0 {
                    -whole - 1
                } else {
                    -whole
                }
            }
        };
        store.push(secs as Raw);
    }
}
