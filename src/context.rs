//! Cancellation handle passed through to host functions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::abi::{Lift, Store, Value, ValueType};

/// An externally controlled cancellation flag.
///
/// The core never checks it. A host function that takes a `Context`
/// parameter receives the store's handle without consuming any stack slots
/// and may poll it during long-running work.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every clone of this handle.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Value for Context {
    fn value_types() -> Vec<ValueType> {
        Vec::new()
    }
}

impl Lift for Context {
    fn lift(store: &mut Store<'_>) -> Self {
        store.context().clone()
    }
}
