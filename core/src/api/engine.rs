//! The Tally compilation engine.

use tracing::debug;

use super::{CompilationOptions, CompiledExpression, EngineOptions, Error};
use crate::registry::Registries;

/// A registry set plus default options.
///
/// The engine is the unit of isolation: hosts that need different
/// capabilities per tenant or per request should build one engine each
/// rather than mutate a shared one.
///
/// # Example
///
/// ```
/// use tally_core::{Bindings, Engine, EngineOptions, Value};
/// use tally_core::registry::Function;
///
/// let mut engine = Engine::new(EngineOptions::default());
/// engine.registries_mut().set_functions([Function::fixed("double", 1, |args| {
///     Ok(Value::Number(args[0].as_number().unwrap_or(0.0) * 2.0))
/// })]);
///
/// let expr = engine.compile("double(21)").unwrap();
/// assert_eq!(expr.evaluate(&Bindings::new()).unwrap(), Value::Number(42.0));
/// assert!(engine.compile("max(1, 2)").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    registries: Registries,
    options: EngineOptions,
}

impl Engine {
    /// An engine with the default registries.
    pub fn new(options: EngineOptions) -> Self {
        Self::with_registries(Registries::default(), options)
    }

    pub fn with_registries(registries: Registries, options: EngineOptions) -> Self {
        Self {
            registries,
            options,
        }
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Mutations only affect expressions compiled afterwards.
    pub fn registries_mut(&mut self) -> &mut Registries {
        &mut self.registries
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Compile with the engine's default compilation options.
    pub fn compile(&self, source: &str) -> Result<CompiledExpression, Error> {
        self.compile_with_options(source, &self.options.default_compilation_options)
    }

    pub fn compile_with_options(
        &self,
        source: &str,
        options: &CompilationOptions,
    ) -> Result<CompiledExpression, Error> {
        debug!(source, "engine compile");
        let compiled = super::compile(source, &self.registries, options)?;
        Ok(compiled.with_options(self.options.default_execution_options.clone()))
    }
}
