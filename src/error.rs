//! Unified error type for the wasm-host-abi library.
//!
//! Errors raised while a value crosses the boundary during a call are not
//! returned: they are recorded on the [`Store`](crate::Store) as an
//! [`AbiError`]. The [`Error`] type here covers setup-time failures and
//! wraps [`AbiError`] for callers that want to turn a recorded error into a
//! `Result`.

use thiserror::Error;

use crate::abi::AbiError;
#[cfg(feature = "wasm")]
use crate::wasm::WasmError;

/// Unified error type for all wasm-host-abi operations.
///
/// # Example
///
/// ```ignore
/// use wasm_host_abi::{Module, Result};
///
/// fn register(env: &mut Module) -> Result<()> {
///     env.define("add", |a: i32, b: i32| a + b)?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error recorded while lifting or lowering a value.
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// A function name was registered twice in one module.
    #[error("Function '{func}' is already defined in module '{module}'")]
    DuplicateFunction { module: String, func: String },

    /// A module name was registered twice.
    #[error("Module '{0}' is already defined")]
    DuplicateModule(String),

    /// Error from the wasmtime binding.
    #[cfg(feature = "wasm")]
    #[error(transparent)]
    Wasm(#[from] WasmError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is an ABI error.
    pub fn is_abi(&self) -> bool {
        matches!(self, Self::Abi(_))
    }

    /// Returns `true` if this error was raised while registering functions.
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateFunction { .. } | Self::DuplicateModule(_)
        )
    }

    /// Returns `true` if this is a wasmtime binding error.
    #[cfg(feature = "wasm")]
    pub fn is_wasm(&self) -> bool {
        matches!(self, Self::Wasm(_))
    }
}
