//! Compiled Tally expressions.

use std::collections::BTreeSet;

use ecow::EcoString;

use super::{Error, ExecutionOptions};
use crate::{
    compiler::Program,
    values::{Bindings, Value},
    vm::{Code, VM},
};

/// An immutable, reusable compiled expression.
///
/// Holds the instruction sequence and the set of free variables the caller
/// must supply. Every call target inside the code is already resolved, so the
/// expression is independent of the registries it was compiled against.
///
/// Evaluation borrows the expression immutably and keeps all transient state
/// in a fresh VM, so one expression can be evaluated from several threads at
/// once.
///
/// # Example
///
/// ```
/// use tally_core::{Bindings, Engine, EngineOptions, Value};
///
/// let engine = Engine::new(EngineOptions::default());
/// let expr = engine.compile("x ^ 2 + 1").unwrap();
///
/// for (x, expected) in [(1, 2.0), (3, 10.0)] {
///     let bindings = Bindings::new().with("x", x);
///     assert_eq!(expr.evaluate(&bindings).unwrap(), Value::Number(expected));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    source: EcoString,
    code: Code,
    free_variables: BTreeSet<EcoString>,
    options: ExecutionOptions,
}

static_assertions::assert_impl_all!(CompiledExpression: Send, Sync);

impl CompiledExpression {
    pub(crate) fn new(source: &str, program: Program, options: ExecutionOptions) -> Self {
        Self {
            source: source.into(),
            code: program.code,
            free_variables: program.free_variables,
            options,
        }
    }

    /// Same expression with different default execution options.
    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    /// Execution options used by [`evaluate`](Self::evaluate).
    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    /// Names the bindings must supply, in sorted order.
    pub fn free_variables(&self) -> impl Iterator<Item = &str> {
        self.free_variables.iter().map(EcoString::as_str)
    }

    pub fn has_free_variable(&self, name: &str) -> bool {
        self.free_variables.contains(name)
    }

    /// Free variables with no entry in `bindings`.
    pub fn unbound_variables<'a>(&'a self, bindings: &'a Bindings) -> impl Iterator<Item = &'a str> {
        self.free_variables().filter(|name| !bindings.contains(name))
    }

    pub fn evaluate(&self, bindings: &Bindings) -> Result<Value, Error> {
        self.evaluate_with_options(bindings, &self.options)
    }

    pub fn evaluate_with_options(
        &self,
        bindings: &Bindings,
        options: &ExecutionOptions,
    ) -> Result<Value, Error> {
        VM::execute(&self.code, bindings, options)
    }
}
