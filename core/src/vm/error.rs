//! Evaluation errors.
//!
//! [`RuntimeError`] is what operator and function implementations return. The
//! VM attaches the failing instruction and its source span, producing an
//! [`EvaluationError`]. A free variable missing from the bindings is reported
//! separately as [`UnresolvedVariableError`], since that failure belongs to
//! the caller rather than to the expression.

use ecow::EcoString;
use thiserror::Error;

use crate::{syntax::Span, values::Value};

/// A fault raised while computing a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("index {index} out of bounds (length: {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Index that is not a non-negative integer.
    #[error("invalid index {0}: expected a non-negative integer")]
    InvalidIndex(EcoString),

    /// Argument outside a function's domain, e.g. `fac(-1)`.
    #[error("{0}")]
    Domain(EcoString),

    /// A local function whose definition was skipped (for instance in the
    /// untaken branch of a conditional) was called.
    #[error("local function `{0}` is not defined at this point")]
    UndefinedLocalFunction(EcoString),

    /// Malformed code popped an empty stack.
    #[error("evaluation stack underflow")]
    StackUnderflow,
}

impl RuntimeError {
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        RuntimeError::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }

    pub fn domain(message: impl Into<EcoString>) -> Self {
        RuntimeError::Domain(message.into())
    }
}

/// A [`RuntimeError`] located at the instruction that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} in {instruction}")]
pub struct EvaluationError {
    pub kind: RuntimeError,
    /// Human-readable description of the failing instruction.
    pub instruction: EcoString,
    pub span: Span,
}

/// A free variable with no entry in the binding map, or a local read before
/// its assignment ran.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unresolved variable `{name}`")]
pub struct UnresolvedVariableError {
    pub name: EcoString,
    pub span: Span,
}
