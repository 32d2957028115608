use core::fmt;
use std::sync::Arc;

use ecow::EcoString;

use crate::{values::Value, vm::RuntimeError};

pub type NativeFn = Arc<dyn Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync>;

/// A function registry entry.
///
/// The compiler checks the argument count against `min_arity..=max_arity`, so
/// implementations can index `args` up to `min_arity - 1` without checking.
#[derive(Clone)]
pub struct Function {
    name: EcoString,
    min_arity: usize,
    max_arity: Option<usize>,
    implementation: NativeFn,
}

impl Function {
    /// A function taking `min_arity..=max_arity` arguments; `None` means
    /// unbounded.
    pub fn new<F>(name: impl Into<EcoString>, min_arity: usize, max_arity: Option<usize>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        debug_assert!(max_arity.is_none_or(|max| max >= min_arity));
        Self {
            name: name.into(),
            min_arity,
            max_arity,
            implementation: Arc::new(f),
        }
    }

    /// A function taking exactly `arity` arguments.
    pub fn fixed<F>(name: impl Into<EcoString>, arity: usize, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self::new(name, arity, Some(arity), f)
    }

    /// A function taking at least `min_arity` arguments.
    pub fn variadic<F>(name: impl Into<EcoString>, min_arity: usize, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self::new(name, min_arity, None, f)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_arity(&self) -> usize {
        self.min_arity
    }

    pub fn max_arity(&self) -> Option<usize> {
        self.max_arity
    }

    pub fn accepts(&self, argc: usize) -> bool {
        argc >= self.min_arity && self.max_arity.is_none_or(|max| argc <= max)
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.implementation)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("min_arity", &self.min_arity)
            .field("max_arity", &self.max_arity)
            .finish_non_exhaustive()
    }
}
