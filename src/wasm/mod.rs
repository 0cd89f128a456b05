//! Wasmtime binding shim.
//!
//! Registers [`Modules`](crate::Modules) as wasmtime host functions. Each
//! registered function copies wasmtime's arguments onto a fresh stack,
//! attaches the caller's exported memory and the binding's shared reference
//! table, runs the host function, then copies the remaining cells back as
//! results.

mod binding;
mod config;
mod error;

pub use binding::WasmtimeBinding;
pub use config::BindingConfig;
pub use error::WasmError;
