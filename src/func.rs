//! Host function descriptors and the arity adapters that build them.
//!
//! A native function of 0 to 18 typed parameters and one typed result is
//! turned into a [`HostFunc`] whose invocation closure works purely on a
//! [`Store`]: it lifts the parameters, calls the function, and lowers the
//! result.
//!
//! The caller pushes argument slots in declaration order, so the last
//! parameter sits on top of the stack. The adapter therefore lifts
//! parameters in reverse declaration order. Getting this wrong silently
//! swaps arguments of the same width.
//!
//! Use `()` as the result for functions that return nothing, and nest
//! 2-tuples to accept or return more values than the adapters cover.
//!
//! # Example
//!
//! ```ignore
//! use wasm_host_abi::HostFunc;
//!
//! let sub = HostFunc::new(|a: i32, b: i32| a - b);
//! assert_eq!(sub.num_params(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::abi::{Lift, Lower, Store, ValueType, merge_value_types};
use crate::logging::trace;

type CallFn = dyn Fn(&mut Store<'_>) + Send + Sync;

/// A host-defined function bound to the stack/memory calling convention.
///
/// Built once at registration time and immutable afterwards; cloning shares
/// the invocation closure.
#[derive(Clone)]
pub struct HostFunc {
    params: Vec<Vec<ValueType>>,
    results: Vec<ValueType>,
    call: Arc<CallFn>,
}

impl HostFunc {
    /// Wrap a native function. See the module documentation for the
    /// supported shapes.
    pub fn new<Args, F: IntoHostFunc<Args>>(func: F) -> Self {
        func.into_host_func()
    }

    /// Build a descriptor from explicit slot kinds and a raw closure.
    ///
    /// The closure must consume exactly `params` and push exactly `results`.
    pub fn from_raw(
        params: Vec<Vec<ValueType>>,
        results: Vec<ValueType>,
        call: impl Fn(&mut Store<'_>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            params,
            results,
            call: Arc::new(call),
        }
    }

    /// Invoke the function once against a prepared store.
    pub fn call(&self, store: &mut Store<'_>) {
        trace!(
            params = self.params.len(),
            slots = self.num_params(),
            "invoking host function"
        );
        (self.call)(store);
    }

    /// Slot kinds of each parameter, in declaration order.
    pub fn params(&self) -> &[Vec<ValueType>] {
        &self.params
    }

    /// Total number of stack slots taken by the parameters.
    pub fn num_params(&self) -> usize {
        self.params.iter().map(Vec::len).sum()
    }

    /// Total number of stack slots produced by the result.
    pub fn num_results(&self) -> usize {
        self.results.len()
    }

    pub fn param_value_types(&self) -> Vec<ValueType> {
        merge_value_types(&self.params)
    }

    pub fn result_value_types(&self) -> &[ValueType] {
        &self.results
    }
}

impl fmt::Debug for HostFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunc")
            .field("params", &self.params)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

/// Conversion of a native function into a [`HostFunc`].
///
/// `Args` is the tuple of parameter types; it only exists to keep the
/// per-arity implementations apart.
pub trait IntoHostFunc<Args> {
    fn into_host_func(self) -> HostFunc;
}

/// Expands to `let` bindings that lift the listed parameters last-to-first.
macro_rules! lift_params {
    ($store:ident;) => {};
    ($store:ident; $ty:ident $var:ident $(, $rest_ty:ident $rest_var:ident)*) => {
        lift_params!($store; $($rest_ty $rest_var),*);
        let $var = <$ty as Lift>::lift($store);
    };
}

macro_rules! impl_into_host_func {
    ($($ty:ident $var:ident),*) => {
        impl<Func, $($ty,)* Z> IntoHostFunc<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Z + Send + Sync + 'static,
            $($ty: Lift,)*
            Z: Lower,
        {
            fn into_host_func(self) -> HostFunc {
                HostFunc {
                    params: vec![$(<$ty as crate::abi::Value>::value_types()),*],
                    results: <Z as crate::abi::Value>::value_types(),
                    call: Arc::new(move |store: &mut Store<'_>| {
                        lift_params!(store; $($ty $var),*);
                        (self)($($var),*).lower(store);
                    }),
                }
            }
        }
    };
}

impl_into_host_func!();
impl_into_host_func!(A a);
impl_into_host_func!(A a, B b);
impl_into_host_func!(A a, B b, C c);
impl_into_host_func!(A a, B b, C c, D d);
impl_into_host_func!(A a, B b, C c, D d, E e);
impl_into_host_func!(A a, B b, C c, D d, E e, F f);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p, Q q);
impl_into_host_func!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p, Q q, R r);
