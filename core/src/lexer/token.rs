use core::fmt;

use ecow::EcoString;

use crate::syntax::Span;

/// What a token is, along with its literal payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal, already converted.
    Number(f64),
    /// String literal with escapes resolved.
    String(EcoString),
    /// `[A-Za-z_][A-Za-z0-9_]*`. Word operators (`and`, `not`, `sqrt`, ...) are
    /// identifiers at this level; the parser decides based on the registries.
    Identifier(EcoString),
    /// Symbolic operator such as `<=` or `++`.
    Operator(&'static str),
    /// One of `( ) [ ] , . ;`.
    Punctuation(char),
    /// End of input. Always the last token of a successful tokenization.
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Byte offset of the first character of the token.
    pub fn offset(&self) -> usize {
        self.span.start()
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        matches!(self.kind, TokenKind::Operator(op) if op == symbol)
    }

    pub fn is_punctuation(&self, ch: char) -> bool {
        self.kind == TokenKind::Punctuation(ch)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    pub fn as_identifier(&self) -> Option<&EcoString> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::String(s) => write!(f, "string {:?}", s.as_str()),
            TokenKind::Identifier(name) => write!(f, "identifier `{}`", name),
            TokenKind::Operator(op) => write!(f, "`{}`", op),
            TokenKind::Punctuation(ch) => write!(f, "`{}`", ch),
            TokenKind::End => f.write_str("end of input"),
        }
    }
}
