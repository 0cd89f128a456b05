//! Host reference table: small integer handles for host-only values.
//!
//! Values that cannot cross the wire (file handles, connections, parsed
//! documents) stay on the host. The guest holds a [`u32`] handle instead and
//! passes it back on later calls, where [`HostRef`] resolves it.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::abi::{AbiError, Lift, Lower, Store, Value, ValueType};
use crate::logging::trace;

/// A type-erased host value stored in a reference table.
pub type HostValue = Arc<dyn Any + Send + Sync>;

/// Storage for host values referenced by guest-held handles.
///
/// Handles are never 0; 0 means "not yet assigned". Implementations shared
/// across concurrent calls must serialize `put`, `set` and `drop_ref`.
pub trait Refs: Send + Sync {
    /// Look up the value behind `handle`.
    fn get(&self, handle: u32) -> Option<HostValue>;

    /// Overwrite the value behind `handle` in place.
    fn set(&self, handle: u32, value: HostValue);

    /// Store `value` under the next free handle and return that handle.
    fn put(&self, value: HostValue) -> u32;

    /// Remove the entry, making the handle eligible for reissue.
    fn drop_ref(&self, handle: u32) -> Option<HostValue>;

    /// Look up `handle`, falling back to `default` when absent.
    fn get_or(&self, handle: u32, default: HostValue) -> (HostValue, bool) {
        match self.get(handle) {
            Some(value) => (value, true),
            None => (default, false),
        }
    }
}

#[derive(Default)]
struct RefTable {
    entries: HashMap<u32, HostValue>,
    last: u32,
}

/// A [`Refs`] implementation backed by a hash map behind a mutex.
///
/// Handles come from a monotonic counter that skips 0 and any handle still
/// occupied, so a dropped handle is only reissued once the counter wraps.
#[derive(Default)]
pub struct MapRefs {
    table: Mutex<RefTable>,
}

impl MapRefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Entries stay consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, RefTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Refs for MapRefs {
    fn get(&self, handle: u32) -> Option<HostValue> {
        self.lock().entries.get(&handle).cloned()
    }

    fn set(&self, handle: u32, value: HostValue) {
        if handle == 0 {
            return;
        }
        self.lock().entries.insert(handle, value);
    }

    fn put(&self, value: HostValue) -> u32 {
        let mut table = self.lock();
        let mut handle = table.last.wrapping_add(1);
        while handle == 0 || table.entries.contains_key(&handle) {
            handle = handle.wrapping_add(1);
        }
        table.last = handle;
        table.entries.insert(handle, value);
        trace!(handle, "host reference stored");
        handle
    }

    fn drop_ref(&self, handle: u32) -> Option<HostValue> {
        trace!(handle, "host reference dropped");
        self.lock().entries.remove(&handle)
    }
}

impl std::fmt::Debug for MapRefs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.lock();
        f.debug_struct("MapRefs")
            .field("len", &table.entries.len())
            .field("last", &table.last)
            .finish()
    }
}

/// A host value passed to the guest as a handle in one I32 slot.
///
/// Lowering a fresh `HostRef` (id 0) stores the value under a new handle;
/// lowering one that already has an id overwrites that entry in place.
/// Lifting resolves the handle back to a clone of the stored value. An
/// unknown handle records [`AbiError::RefNotFound`], a value of another type
/// records [`AbiError::RefCast`]; both yield `T::default()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostRef<T> {
    pub id: u32,
    pub raw: T,
}

impl<T> HostRef<T> {
    /// Wrap a value that has no handle yet.
    pub fn new(raw: T) -> Self {
        Self { id: 0, raw }
    }

    pub fn into_inner(self) -> T {
        self.raw
    }
}

impl<T> Value for HostRef<T> {
    fn value_types() -> Vec<ValueType> {
        vec![ValueType::I32]
    }
}

impl<T: Any + Send + Sync + Clone + Default> Lift for HostRef<T> {
    fn lift(store: &mut Store<'_>) -> Self {
        let id = store.pop() as u32;
        let stored = store.refs().and_then(|refs| refs.get(id));
        let raw = match stored {
            None => {
                store.fail(AbiError::RefNotFound { handle: id });
                T::default()
            }
            Some(value) => match value.downcast_ref::<T>() {
                Some(raw) => raw.clone(),
                None => {
                    store.fail(AbiError::RefCast {
                        handle: id,
                        expected: type_name::<T>(),
                    });
                    T::default()
                }
            },
        };
        Self { id, raw }
    }
}

impl<T: Any + Send + Sync> Lower for HostRef<T> {
    fn lower(self, store: &mut Store<'_>) {
        let id = match store.refs() {
            Some(refs) if self.id == 0 => refs.put(Arc::new(self.raw)),
            Some(refs) => {
                refs.set(self.id, Arc::new(self.raw));
                self.id
            }
            None => {
                store.fail(AbiError::RefNotFound { handle: self.id });
                self.id
            }
        };
        store.push(u64::from(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::SliceStack;

    #[test]
    fn put_never_returns_zero_or_occupied() {
        let refs = MapRefs::new();
        {
            let mut table = refs.lock();
            table.last = u32::MAX - 1;
            table.entries.insert(1, Arc::new(()));
        }
        assert_eq!(refs.put(Arc::new("a")), u32::MAX);
        // wraps past 0 and the occupied handle 1
        assert_eq!(refs.put(Arc::new("b")), 2);
    }

    #[test]
    fn set_on_zero_handle_is_ignored() {
        let refs = MapRefs::new();
        refs.set(0, Arc::new(5u8));
        assert!(refs.is_empty());
    }

    #[test]
    fn lower_then_lift_resolves_same_value() {
        let refs = MapRefs::new();
        let mut stack = SliceStack::new();
        let mut store = Store::new(&mut stack).with_refs(&refs);

        HostRef::new(String::from("conn")).lower(&mut store);
        let lifted = HostRef::<String>::lift(&mut store);
        assert_eq!(lifted.raw, "conn");
        assert_ne!(lifted.id, 0);
        assert!(store.error().is_none());
    }

    #[test]
    fn lower_with_id_updates_in_place() {
        let refs = MapRefs::new();
        let mut stack = SliceStack::new();
        let mut store = Store::new(&mut stack).with_refs(&refs);

        HostRef::new(1u64).lower(&mut store);
        let mut lifted = HostRef::<u64>::lift(&mut store);
        lifted.raw += 1;
        let id = lifted.id;
        lifted.lower(&mut store);
        assert_eq!(store.pop(), u64::from(id));
        assert_eq!(refs.len(), 1);
        assert_eq!(
            refs.get(id).and_then(|v| v.downcast_ref::<u64>().copied()),
            Some(2)
        );
    }

    #[test]
    fn unknown_handle_records_not_found() {
        let refs = MapRefs::new();
        let mut stack = SliceStack::from(vec![7]);
        let mut store = Store::new(&mut stack).with_refs(&refs);

        let lifted = HostRef::<String>::lift(&mut store);
        assert_eq!(lifted.raw, "");
        assert_eq!(store.error(), Some(&AbiError::RefNotFound { handle: 7 }));
    }

    #[test]
    fn wrong_type_records_cast_error() {
        let refs = MapRefs::new();
        let handle = refs.put(Arc::new(3.5f64));
        let mut stack = SliceStack::from(vec![u64::from(handle)]);
        let mut store = Store::new(&mut stack).with_refs(&refs);

        let lifted = HostRef::<String>::lift(&mut store);
        assert_eq!(lifted.raw, "");
        assert!(matches!(store.error(), Some(AbiError::RefCast { .. })));
        assert!(store.error().is_some_and(AbiError::is_ref));
    }
}
