//! Host modules: the two-level `module -> function -> descriptor` mapping
//! that mirrors the guest's `(module, field)` import addressing.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::{Error, Result};
use crate::func::{HostFunc, IntoHostFunc};
use crate::logging::debug;

/// Host functions exported under one module name.
///
/// # Example
///
/// ```ignore
/// use wasm_host_abi::{Module, Text};
///
/// let mut env = Module::new("env");
/// env.define("add", |a: i32, b: i32| a + b)?;
/// env.define("print", |s: String| println!("{s}"))?;
/// ```
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    funcs: BTreeMap<String, HostFunc>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            funcs: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a prepared descriptor. Fails if the name is taken.
    pub fn insert(&mut self, func_name: impl Into<String>, func: HostFunc) -> Result<&mut Self> {
        match self.funcs.entry(func_name.into()) {
            Entry::Occupied(entry) => Err(Error::DuplicateFunction {
                module: self.name.clone(),
                func: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                debug!(
                    module = %self.name,
                    func = %entry.key(),
                    params = func.num_params(),
                    results = func.num_results(),
                    "host function registered"
                );
                entry.insert(func);
                Ok(self)
            }
        }
    }

    /// Wrap a native function and register it. Fails if the name is taken.
    pub fn define<Args, F: IntoHostFunc<Args>>(
        &mut self,
        func_name: impl Into<String>,
        func: F,
    ) -> Result<&mut Self> {
        self.insert(func_name, HostFunc::new(func))
    }

    pub fn get(&self, func_name: &str) -> Option<&HostFunc> {
        self.funcs.get(func_name)
    }

    /// Functions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HostFunc)> {
        self.funcs.iter().map(|(name, func)| (name.as_str(), func))
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

/// A set of host modules, built once at setup time and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Modules {
    modules: BTreeMap<String, Module>,
}

impl Modules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully built module. Fails if a module with that name exists.
    pub fn add(&mut self, module: Module) -> Result<&mut Self> {
        match self.modules.entry(module.name.clone()) {
            Entry::Occupied(entry) => Err(Error::DuplicateModule(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(module);
                Ok(self)
            }
        }
    }

    /// The module with this name, created empty if missing.
    pub fn module_mut(&mut self, name: &str) -> &mut Module {
        self.modules
            .entry(name.to_string())
            .or_insert_with(|| Module::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Look up a function by its `(module, field)` import address.
    pub fn func(&self, module: &str, func_name: &str) -> Option<&HostFunc> {
        self.get(module).and_then(|m| m.get(func_name))
    }

    /// Modules in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_function_is_rejected() -> Result<()> {
        let mut env = Module::new("env");
        env.define("add", |a: i32, b: i32| a + b)?;
        let err = env.define("add", |a: i32| a);
        assert!(matches!(
            err,
            Err(Error::DuplicateFunction { ref module, ref func }) if module == "env" && func == "add"
        ));
        assert_eq!(env.len(), 1);
        Ok(())
    }

    #[test]
    fn duplicate_module_is_rejected() -> Result<()> {
        let mut modules = Modules::new();
        modules.add(Module::new("env"))?;
        assert!(matches!(
            modules.add(Module::new("env")),
            Err(Error::DuplicateModule(name)) if name == "env"
        ));
        Ok(())
    }

    #[test]
    fn lookup_by_import_address() -> Result<()> {
        let mut modules = Modules::new();
        modules
            .module_mut("math")
            .define("neg", |x: i64| -x)?
            .define("abs", |x: i64| x.abs())?;
        assert!(modules.func("math", "neg").is_some());
        assert!(modules.func("math", "sqrt").is_none());
        assert!(modules.func("env", "neg").is_none());
        let names: Vec<&str> = modules
            .get("math")
            .map(|m| m.iter().map(|(name, _)| name).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["abs", "neg"]);
        Ok(())
    }
}
