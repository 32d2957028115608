//! Tally - a sandboxed arithmetic expression language.
//!
//! # Overview
//!
//! Tally evaluates untrusted arithmetic and logical expressions inside a host
//! application. Typical uses are spreadsheet-like formulas, pricing rules and
//! user-defined thresholds.
//!
//! What an expression can call is decided entirely by the [`Registries`] it
//! is compiled against. Every call is resolved at compile time; values
//! supplied through [`Bindings`] are plain data and can never be invoked.
//!
//! # Quick Start
//!
//! ```
//! use tally::{Bindings, Engine, EngineOptions, Value};
//!
//! let engine = Engine::new(EngineOptions::default());
//! let expr = engine.compile("price * (1 - discount) + fee").unwrap();
//!
//! let bindings = Bindings::new()
//!     .with("price", 200)
//!     .with("discount", 0.25)
//!     .with("fee", 5);
//! assert_eq!(expr.evaluate(&bindings).unwrap(), Value::Number(155.0));
//! ```
//!
//! # Restricting capabilities
//!
//! ```
//! use tally::{CompilationOptions, Registries, compile};
//!
//! let mut registries = Registries::default();
//! registries.set_functions([]);
//!
//! let options = CompilationOptions::default();
//! assert!(compile("1 + 2 * 3", &registries, &options).is_ok());
//! assert!(compile("max(1, 2)", &registries, &options).is_err());
//! ```

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from tally_core
pub use tally_core::api::{
    CompilationOptions, CompiledExpression, Diagnostic, Engine, EngineOptions, Error,
    ExecutionOptions, RelatedInfo, ResourceLimitError, ResourceLimitKind, Severity, compile,
    evaluate,
};

// Re-export registry types and values
pub use tally_core::registry::{
    self, Arity, Associativity, Function, Junction, Operator, Precedence, Registries,
};
pub use tally_core::values::{Bindings, Value};

// Re-export errors
pub use tally_core::lexer::{LexError, LexErrorKind};
pub use tally_core::parser::{ParseError, ParseErrorKind};
pub use tally_core::vm::{EvaluationError, RuntimeError, UnresolvedVariableError};
