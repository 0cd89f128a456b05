//! Error types for the wasmtime binding.

use thiserror::Error;

use crate::abi::{AbiError, ValueType};

/// Errors that can occur while binding host modules to wasmtime or while a
/// bound function runs.
#[derive(Error, Debug)]
pub enum WasmError {
    /// Wasmtime engine or linker error.
    #[error("Wasmtime error: {0}")]
    Wasmtime(#[from] wasmtime::Error),

    /// A descriptor uses a slot kind the binding cannot express.
    #[error("Function '{func}' uses slot kind {value_type:?}, which is not supported by the wasmtime binding")]
    UnsupportedValueType { func: String, value_type: ValueType },

    /// The guest passed a value whose kind does not match the descriptor.
    #[error("Function '{func}' received an argument of an unexpected kind")]
    ArgumentMismatch { func: String },

    /// The host function pushed a different number of result slots than it
    /// declared.
    #[error("Function '{func}' produced {actual} result slots, expected {expected}")]
    ResultCount {
        func: String,
        expected: usize,
        actual: usize,
    },

    /// A recorded ABI error turned into a trap.
    #[error("Function '{func}' failed: {source}")]
    Call {
        func: String,
        #[source]
        source: AbiError,
    },
}
