//! Core of the Tally expression language.
//!
//! The pipeline is `source -> lexer -> parser -> compiler -> vm`:
//!
//! - [`lexer`] turns text into positioned tokens.
//! - [`parser`] builds an AST by precedence climbing over the token stream.
//! - [`compiler`] resolves every name against the [`registry`] tables and
//!   emits a linear instruction sequence.
//! - [`vm`] executes that sequence against caller-supplied bindings.
//!
//! Call targets are fixed at compile time. Nothing that arrives through a
//! binding map can ever be invoked.

pub mod api;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod stdlib;
pub mod syntax;
pub mod values;
pub mod vm;

pub use api::{
    CompilationOptions, CompiledExpression, Diagnostic, Engine, EngineOptions, Error,
    ExecutionOptions, Severity, compile, evaluate,
};
pub use registry::Registries;
pub use values::{Bindings, Value};
