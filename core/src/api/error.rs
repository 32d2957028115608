//! Public error types.
//!
//! Every failure of [`compile`](super::compile) or
//! [`evaluate`](super::evaluate) is an [`Error`]. Each variant carries a span
//! into the source text and converts to a [`Diagnostic`] with a stable code:
//!
//! | Prefix | Category                     |
//! |--------|------------------------------|
//! | `L`    | tokenization                 |
//! | `P`    | grammar and name resolution  |
//! | `V`    | unresolved variables         |
//! | `E`    | evaluation faults            |
//! | `R`    | resource limits              |

use core::fmt;

use thiserror::Error;

use crate::{
    lexer::{LexError, LexErrorKind},
    parser::ParseError,
    syntax::Span,
    vm::{EvaluationError, RuntimeError, UnresolvedVariableError},
};

/// Any failure of the compile or evaluate pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed token.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Malformed grammar, unknown call target or illegal assignment target.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A free variable was not supplied in the bindings.
    #[error(transparent)]
    UnresolvedVariable(#[from] UnresolvedVariableError),

    /// Arithmetic, type or index fault during execution.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Nesting, size, call depth or step budget exceeded.
    #[error(transparent)]
    ResourceLimit(#[from] ResourceLimitError),
}

impl Error {
    /// Location of the failure in the source text.
    pub fn span(&self) -> &Span {
        match self {
            Error::Lex(e) => &e.span,
            Error::Parse(e) => &e.span,
            Error::UnresolvedVariable(e) => &e.span,
            Error::Evaluation(e) => &e.span,
            Error::ResourceLimit(e) => &e.span,
        }
    }

    /// Convert to a diagnostic for rendering or editor integration.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Lex(e) => lex_diagnostic(e),
            Error::Parse(e) => e.to_diagnostic(),
            Error::UnresolvedVariable(e) => Diagnostic::error(
                "V001",
                format!("Unresolved variable `{}`", e.name),
                e.span.clone(),
            )
            .with_help("Supply a value for it in the bindings"),
            Error::Evaluation(e) => evaluation_diagnostic(e),
            Error::ResourceLimit(e) => e.to_diagnostic(),
        }
    }
}

fn lex_diagnostic(err: &LexError) -> Diagnostic {
    let message = capitalize(&err.kind.to_string());
    let diagnostic = Diagnostic::error("L001", message, err.span.clone());
    match err.kind {
        LexErrorKind::UnterminatedString => diagnostic.with_help("Add the closing quote"),
        _ => diagnostic,
    }
}

fn evaluation_diagnostic(err: &EvaluationError) -> Diagnostic {
    let code = match err.kind {
        RuntimeError::DivisionByZero => "E001",
        RuntimeError::TypeMismatch { .. } => "E002",
        RuntimeError::IndexOutOfBounds { .. } => "E003",
        RuntimeError::InvalidIndex(_) => "E004",
        RuntimeError::Domain(_) => "E005",
        RuntimeError::UndefinedLocalFunction(_) => "E006",
        RuntimeError::StackUnderflow => "E007",
    };
    Diagnostic::error(
        code,
        format!("{} in {}", capitalize(&err.kind.to_string()), err.instruction),
        err.span.clone(),
    )
}

pub(crate) fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Resource limits
// ============================================================================

/// A configured bound was exceeded. Always fails closed: the compile or
/// evaluate call is aborted with no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ResourceLimitError {
    pub kind: ResourceLimitKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLimitKind {
    /// Parser nesting beyond `max_recursion_depth`.
    NestingDepth { limit: usize },
    /// Compiled program larger than `max_instruction_count`.
    InstructionCount { limit: usize },
    /// Local function calls nested beyond `max_depth`.
    CallDepth { limit: usize },
    /// More than `max_steps` instructions executed.
    Steps { limit: usize },
}

impl fmt::Display for ResourceLimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLimitKind::NestingDepth { limit } => {
                write!(f, "expression nesting exceeds maximum depth of {}", limit)
            }
            ResourceLimitKind::InstructionCount { limit } => {
                write!(f, "compiled program exceeds maximum of {} instructions", limit)
            }
            ResourceLimitKind::CallDepth { limit } => {
                write!(f, "function calls exceed maximum depth of {}", limit)
            }
            ResourceLimitKind::Steps { limit } => {
                write!(f, "evaluation exceeds maximum of {} steps", limit)
            }
        }
    }
}

impl ResourceLimitError {
    pub fn new(kind: ResourceLimitKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match self.kind {
            ResourceLimitKind::NestingDepth { .. } => {
                ("R001", "Reduce nesting or simplify the expression")
            }
            ResourceLimitKind::InstructionCount { .. } => ("R002", "Split the expression up"),
            ResourceLimitKind::CallDepth { .. } => ("R003", "Check for unbounded recursion"),
            ResourceLimitKind::Steps { .. } => ("R004", "Check for unbounded recursion"),
        };
        Diagnostic::error(code, capitalize(&self.kind.to_string()), self.span.clone())
            .with_help(help)
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// A diagnostic message with source location.
///
/// Maps cleanly to LSP diagnostics and to `ariadne` reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Stable error code (e.g. "P001") for documentation lookup.
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &str, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            related: Vec::new(),
            help: None,
            code: Some(code.to_string()),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push(RelatedInfo {
            span,
            message: message.into(),
        });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(help) = &self.help {
            write!(f, "\nhelp: {}", help)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g. "opened here").
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}
