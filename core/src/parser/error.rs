use ecow::EcoString;
use thiserror::Error;

use crate::{
    api::{Diagnostic, error::capitalize},
    syntax::Span,
};

/// Compile-time failure: malformed grammar or a name that cannot be resolved
/// to a legal target. Raised by both the parser and the compiler.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// Where an unclosed delimiter was opened.
    pub opened_at: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: EcoString,
    },

    #[error("unclosed delimiter '{delimiter}'")]
    UnclosedDelimiter { delimiter: char },

    #[error("unexpected {found} after the end of the expression")]
    TrailingInput { found: EcoString },

    #[error("unknown function `{0}`")]
    UnknownFunction(EcoString),

    #[error("unknown operator `{0}`")]
    UnknownOperator(EcoString),

    #[error("`{name}` expects {expected} argument(s), found {found}")]
    ArityMismatch {
        name: EcoString,
        expected: EcoString,
        found: usize,
    },

    /// Call whose callee is a variable, a parameter or a computed value.
    #[error("`{0}` is not callable")]
    NotCallable(EcoString),

    #[error("function `{0}` can only be called, not used as a value")]
    FunctionAsValue(EcoString),

    #[error("operator `{0}` cannot be used as a value")]
    OperatorAsValue(EcoString),

    #[error("invalid assignment target")]
    IllegalAssignmentTarget,

    #[error("duplicate parameter `{0}`")]
    DuplicateParameter(EcoString),

    #[error("member `{0}` is not accessible")]
    ForbiddenMember(EcoString),

    #[error("{0} is disabled")]
    DisabledFeature(&'static str),

    #[error("local function `{0}` shadows a registered function")]
    ShadowsRegistryFunction(EcoString),
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            opened_at: None,
        }
    }

    pub fn unclosed(delimiter: char, span: Span, opened_at: Span) -> Self {
        Self {
            kind: ParseErrorKind::UnclosedDelimiter { delimiter },
            span,
            opened_at: Some(opened_at),
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        use ParseErrorKind::*;

        let (code, help) = match &self.kind {
            UnexpectedToken { .. } => ("P001", None),
            UnclosedDelimiter { .. } => ("P002", Some("Add the missing closing delimiter")),
            TrailingInput { .. } => ("P003", Some("Separate statements with `;`")),
            UnknownFunction(_) => (
                "P004",
                Some("Only registered functions and local functions in scope can be called"),
            ),
            UnknownOperator(_) => ("P005", None),
            ArityMismatch { .. } => ("P006", None),
            NotCallable(_) => ("P007", Some("Values from bindings can never be called")),
            FunctionAsValue(_) => ("P008", Some("Call it with arguments")),
            OperatorAsValue(_) => ("P009", None),
            IllegalAssignmentTarget => (
                "P010",
                Some("Assign to a plain name, or define a function as `f(x) = ...`"),
            ),
            DuplicateParameter(_) => ("P011", None),
            ForbiddenMember(_) => ("P012", Some("Accessible members: length, first, last")),
            DisabledFeature(_) => ("P013", None),
            ShadowsRegistryFunction(_) => ("P014", Some("Choose another name")),
        };

        let message = capitalize(&self.kind.to_string());
        let mut diagnostic = Diagnostic::error(code, message, self.span.clone());
        if let Some(help) = help {
            diagnostic = diagnostic.with_help(help);
        }
        if let Some(opened_at) = &self.opened_at {
            diagnostic = diagnostic.with_related(opened_at.clone(), "opened here");
        }
        diagnostic
    }
}
