//! Public API for the Tally expression language.
//!
//! Two entry points cover the whole pipeline:
//!
//! - [`compile`] resolves every name in `source` against a registry snapshot
//!   and returns an immutable [`CompiledExpression`].
//! - [`evaluate`] runs a compiled expression against one set of
//!   [`Bindings`].
//!
//! [`Engine`] bundles a registry set with default options for hosts that
//! compile many expressions under the same capabilities.
//!
//! # Example
//!
//! ```
//! use tally_core::{Bindings, CompilationOptions, Registries, Value, compile, evaluate};
//!
//! let registries = Registries::default();
//! let expr = compile("max(a, b) * 2", &registries, &CompilationOptions::default()).unwrap();
//! assert_eq!(expr.free_variables().collect::<Vec<_>>(), ["a", "b"]);
//!
//! let bindings = Bindings::new().with("a", 3).with("b", 7);
//! assert_eq!(evaluate(&expr, &bindings).unwrap(), Value::Number(14.0));
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod options;


pub use engine::Engine;
pub use error::{Diagnostic, Error, RelatedInfo, ResourceLimitError, ResourceLimitKind, Severity};
pub use expression::CompiledExpression;
pub use options::{CompilationOptions, EngineOptions, ExecutionOptions};

use tracing::debug;

use crate::{
    compiler::BytecodeCompiler,
    parser,
    registry::Registries,
    values::{Bindings, Value},
};

/// Compile `source` against `registries`.
///
/// The registries are only read during this call. Changing them afterwards
/// does not affect the returned expression.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn compile(
    source: &str,
    registries: &Registries,
    options: &CompilationOptions,
) -> Result<CompiledExpression, Error> {
    let ast = parser::parse(source, registries, options)?;
    let program = BytecodeCompiler::compile(source, &ast, registries, options)?;
    debug!(
        instructions = program.code.size(),
        free_variables = program.free_variables.len(),
        "compiled"
    );
    Ok(CompiledExpression::new(source, program, ExecutionOptions::default()))
}

/// Evaluate `expression` with `bindings` supplying its free variables.
#[tracing::instrument(level = "debug", skip_all)]
pub fn evaluate(expression: &CompiledExpression, bindings: &Bindings) -> Result<Value, Error> {
    expression.evaluate(bindings)
}
