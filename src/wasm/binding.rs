//! Registration of host modules with a wasmtime [`Linker`].

use std::sync::Arc;

use wasmtime::{Caller, Engine, Extern, FuncType, Linker, Val, ValType};

use super::config::BindingConfig;
use super::error::WasmError;
use crate::abi::{Raw, SliceStack, Stack, Store, ValueType};
use crate::context::Context;
use crate::func::HostFunc;
use crate::logging::{error, info, warn};
use crate::module::{Module, Modules};
use crate::refs::{MapRefs, Refs};

/// Binds [`Modules`] to a wasmtime [`Linker`].
///
/// Every call gets a fresh stack built from wasmtime's arguments and the
/// caller's exported memory. The reference table and cancellation context
/// are shared by all calls into functions defined through one binding.
///
/// # Example
///
/// ```ignore
/// use wasm_host_abi::{Modules, wasm::{BindingConfig, WasmtimeBinding}};
///
/// let mut modules = Modules::new();
/// modules.module_mut("env").define("add", |a: i32, b: i32| a + b)?;
///
/// let mut linker = wasmtime::Linker::new(&engine);
/// WasmtimeBinding::new(BindingConfig::default()).define(&modules, &mut linker)?;
/// ```
#[derive(Clone)]
pub struct WasmtimeBinding {
    config: BindingConfig,
    refs: Arc<dyn Refs>,
    context: Context,
}

impl WasmtimeBinding {
    pub fn new(config: BindingConfig) -> Self {
        Self {
            config,
            refs: Arc::new(MapRefs::new()),
            context: Context::default(),
        }
    }

    /// Share an existing reference table, e.g. one the host pre-populated.
    pub fn with_refs(mut self, refs: Arc<dyn Refs>) -> Self {
        self.refs = refs;
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn refs(&self) -> &Arc<dyn Refs> {
        &self.refs
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Register every function of every module.
    pub fn define<T: 'static>(
        &self,
        modules: &Modules,
        linker: &mut Linker<T>,
    ) -> Result<(), WasmError> {
        for module in modules.iter() {
            self.define_module(module, linker)?;
        }
        Ok(())
    }

    /// Register every function of one module under its name.
    pub fn define_module<T: 'static>(
        &self,
        module: &Module,
        linker: &mut Linker<T>,
    ) -> Result<(), WasmError> {
        for (name, func) in module.iter() {
            let label = format!("{}.{}", module.name(), name);
            let ty = func_type(linker.engine(), &label, func)?;
            let handler = self.handler(label, func.clone());
            linker.func_new(module.name(), name, ty, move |caller, params, results| {
                handler.invoke(caller, params, results)
            })?;
        }
        info!(module = %module.name(), funcs = module.len(), "host module defined");
        Ok(())
    }

    fn handler(&self, label: String, func: HostFunc) -> Handler {
        Handler {
            label,
            results: func.result_value_types().to_vec(),
            func,
            config: self.config.clone(),
            refs: Arc::clone(&self.refs),
            context: self.context.clone(),
        }
    }
}

impl std::fmt::Debug for WasmtimeBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WasmtimeBinding")
            .field("config", &self.config)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Modules {
    /// Register all modules with default binding settings.
    pub fn define_wasmtime<T: 'static>(&self, linker: &mut Linker<T>) -> Result<(), WasmError> {
        WasmtimeBinding::new(BindingConfig::default()).define(self, linker)
    }
}

/// State captured by one registered wasmtime function.
struct Handler {
    label: String,
    results: Vec<ValueType>,
    func: HostFunc,
    config: BindingConfig,
    refs: Arc<dyn Refs>,
    context: Context,
}

impl Handler {
    fn invoke<T: 'static>(
        &self,
        mut caller: Caller<'_, T>,
        params: &[Val],
        results: &mut [Val],
    ) -> wasmtime::Result<()> {
        let mut stack = SliceStack::with_capacity(params.len().max(results.len()));
        for param in params {
            let raw = val_to_raw(param).ok_or_else(|| {
                wasmtime::Error::new(WasmError::ArgumentMismatch {
                    func: self.label.clone(),
                })
            })?;
            stack.push(raw);
        }

        let memory = caller
            .get_export(&self.config.memory_export)
            .and_then(Extern::into_memory);
        let mut data = memory.map(|memory| memory.data_mut(&mut caller));

        let recorded = {
            let mut store = Store::new(&mut stack)
                .with_refs(self.refs.as_ref())
                .with_context(self.context.clone());
            if let Some(data) = data.as_mut() {
                store = store.with_memory(data);
            }
            self.func.call(&mut store);
            store.take_error()
        };

        if let Some(err) = recorded {
            if self.config.trap_on_error {
                error!(func = %self.label, error = %err, "host call failed");
                return Err(wasmtime::Error::new(WasmError::Call {
                    func: self.label.clone(),
                    source: err,
                }));
            }
            warn!(func = %self.label, error = %err, "host call completed with an error");
        }

        let cells = stack.into_vec();
        if cells.len() != results.len() || cells.len() != self.results.len() {
            return Err(wasmtime::Error::new(WasmError::ResultCount {
                func: self.label.clone(),
                expected: results.len(),
                actual: cells.len(),
            }));
        }
        for (slot, (ty, raw)) in results.iter_mut().zip(self.results.iter().zip(cells)) {
            *slot = raw_to_val(*ty, raw);
        }
        Ok(())
    }
}

fn func_type(engine: &Engine, label: &str, func: &HostFunc) -> Result<FuncType, WasmError> {
    let params = func
        .param_value_types()
        .into_iter()
        .map(|ty| val_type(label, ty))
        .collect::<Result<Vec<_>, _>>()?;
    let results = func
        .result_value_types()
        .iter()
        .map(|ty| val_type(label, *ty))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FuncType::new(engine, params, results))
}

fn val_type(label: &str, ty: ValueType) -> Result<ValType, WasmError> {
    match ty {
        ValueType::I32 => Ok(ValType::I32),
        ValueType::I64 => Ok(ValType::I64),
        ValueType::F32 => Ok(ValType::F32),
        ValueType::F64 => Ok(ValType::F64),
        ValueType::ExternRef => Err(WasmError::UnsupportedValueType {
            func: label.to_string(),
            value_type: ty,
        }),
    }
}

fn val_to_raw(val: &Val) -> Option<Raw> {
    match val {
        Val::I32(v) => Some(Raw::from(*v as u32)),
        Val::I64(v) => Some(*v as Raw),
        Val::F32(bits) => Some(Raw::from(*bits)),
        Val::F64(bits) => Some(*bits),
        _ => None,
    }
}

fn raw_to_val(ty: ValueType, raw: Raw) -> Val {
    match ty {
        ValueType::I32 => Val::I32(raw as u32 as i32),
        ValueType::I64 => Val::I64(raw as i64),
        ValueType::F32 => Val::F32(raw as u32),
        ValueType::F64 | ValueType::ExternRef => Val::F64(raw),
    }
}
