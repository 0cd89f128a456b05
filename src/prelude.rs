//! Convenient re-exports for common usage patterns.
//!
//! This module provides a single import to bring all commonly used types
//! into scope.
//!
//! # Example
//!
//! ```ignore
//! use wasm_host_abi::prelude::*;
//!
//! let mut env = Module::new("env");
//! env.define("greet", |name: String| Text::new(1024, format!("hi {name}")))?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Wire model
pub use crate::abi::{
    AbiError, Addr, Lift, LinearMemory, Lower, Memory, MemoryLift, MemoryLower, MemoryValue, Raw,
    SliceStack, Stack, Store, Value, ValueType,
};

// Codecs and host values
pub use crate::context::Context;
pub use crate::refs::{HostRef, MapRefs, Refs};
pub use crate::types::{
    Bytes, Complex64, Complex128, List, ListStrings, ResultValue, ReturnedList, Text,
};

// Registration
pub use crate::func::{HostFunc, IntoHostFunc};
pub use crate::module::{Module, Modules};

// Wasmtime binding (requires "wasm" feature)
#[cfg(feature = "wasm")]
pub use crate::wasm::{BindingConfig, WasmError, WasmtimeBinding};
