//! Typed host functions for WebAssembly guests.
//!
//! This library lets a host expose native Rust functions to a WebAssembly
//! guest without hand-writing the marshalling between the VM's untyped
//! operand stack, the guest's linear memory and Rust values.
//!
//! # Quick Start
//!
//! ```ignore
//! use wasm_host_abi::prelude::*;
//!
//! let mut modules = Modules::new();
//! modules
//!     .module_mut("env")
//!     .define("sub", |a: i32, b: i32| a - b)?
//!     .define("strlen", |s: String| s.len() as u32)?;
//!
//! // In-process invocation: push the arguments, call, pop the result.
//! let mut stack = SliceStack::from(vec![18, 12]);
//! let mut store = Store::new(&mut stack);
//! modules.func("env", "sub").map(|f| f.call(&mut store));
//! assert_eq!(store.pop(), 6);
//! ```
//!
//! # Modules
//!
//! - [`abi`] - Slot kinds, value capability traits, stack, memory and the per-call [`Store`]
//! - [`types`] - Codecs for scalars, strings, byte buffers, lists and results
//! - [`refs`] - Host reference table for values that never leave the host
//! - [`func`] - Host function descriptors and the arity adapters
//! - [`module`] - Named groups of host functions
//! - [`wasm`] - Wasmtime binding shim (requires `wasm` feature)
//!
//! # Feature Flags
//!
//! - `wasm` - Enable the wasmtime binding
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `serde` - Make [`wasm::BindingConfig`] deserializable
//! - `full` - Enable all features

pub mod abi;
pub mod context;
pub mod func;
mod logging;
pub mod module;
pub mod prelude;
pub mod refs;
pub mod types;
#[cfg(feature = "wasm")]
pub mod wasm;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export the wire model at crate root for convenience
pub use abi::{
    AbiError, Addr, LiftLower, Lift, LinearMemory, Lower, Memory, MemoryLift, MemoryLower,
    MemoryValue, Raw, SliceStack, Stack, Store, Value, ValueType,
};
pub use context::Context;
pub use func::{HostFunc, IntoHostFunc};
pub use module::{Module, Modules};
pub use refs::{HostRef, HostValue, MapRefs, Refs};
pub use types::{
    Bytes, Complex64, Complex128, List, ListStrings, ResultValue, ReturnedList, Text,
};

// Re-export wasmtime binding types at crate root for convenience
#[cfg(feature = "wasm")]
pub use wasm::{BindingConfig, WasmError, WasmtimeBinding};
