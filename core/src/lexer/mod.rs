//! Tokenizer.
//!
//! A single forward pass over the source built on `logos`. Multi-character
//! operators are matched longest-first, so `<=` never splits into `<` `=`.
//! The lexer has no semantic knowledge: word operators such as `and` come out
//! as identifiers.

mod token;


pub use token::{Token, TokenKind};

use logos::Logos;
use thiserror::Error;

use crate::syntax::{
    Span,
    string_literal::{UnescapeError, unescape_string},
};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
enum RawToken {
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Decimal,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    Hex,

    #[regex(r"0[bB][01]+")]
    Binary,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r#"'(?:[^'\\]|\\.)*'"#)]
    SingleQuoted,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("=")]
    Assign,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
}

impl RawToken {
    fn operator(self) -> Option<&'static str> {
        use RawToken::*;
        Some(match self {
            EqEq => "==",
            NotEq => "!=",
            LtEq => "<=",
            GtEq => ">=",
            Lt => "<",
            Gt => ">",
            AndAnd => "&&",
            OrOr => "||",
            PlusPlus => "++",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Caret => "^",
            Bang => "!",
            Assign => "=",
            Question => "?",
            Colon => ":",
            _ => return None,
        })
    }

    fn punctuation(self) -> Option<char> {
        use RawToken::*;
        Some(match self {
            LParen => '(',
            RParen => ')',
            LBracket => '[',
            RBracket => ']',
            Comma => ',',
            Dot => '.',
            Semicolon => ';',
            _ => return None,
        })
    }
}

/// Tokenization failure. Fatal to the tokenize call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at offset {}", span.start())]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("{0}")]
    InvalidEscape(#[from] UnescapeError),
}

impl LexError {
    /// Byte offset of the offending character.
    pub fn offset(&self) -> usize {
        self.span.start()
    }
}

/// Lazy, forward-only token stream over a source string.
///
/// Yields `Ok` tokens ending with exactly one [`TokenKind::End`], or stops
/// after the first `Err`.
///
/// # Example
///
/// ```
/// use tally_core::lexer::{Lexer, TokenKind};
///
/// let kinds: Vec<_> = Lexer::new("a <= 2")
///     .map(|t| t.unwrap().kind)
///     .collect();
/// assert_eq!(kinds[1], TokenKind::Operator("<="));
/// assert_eq!(kinds.last(), Some(&TokenKind::End));
/// ```
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, RawToken>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: RawToken::lexer(source),
            finished: false,
        }
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) -> Option<Result<Token, LexError>> {
        self.finished = true;
        Some(Err(LexError { kind, span }))
    }

    fn convert(&self, raw: RawToken, span: Span) -> Result<Token, LexError> {
        let slice = self.inner.slice();
        let invalid_number = || LexError {
            kind: LexErrorKind::InvalidNumber(slice.to_string()),
            span: span.clone(),
        };
        let kind = match raw {
            RawToken::Decimal => {
                TokenKind::Number(slice.parse::<f64>().map_err(|_| invalid_number())?)
            }
            RawToken::Hex | RawToken::Binary => {
                let radix = if raw == RawToken::Hex { 16 } else { 2 };
                let n = u64::from_str_radix(&slice[2..], radix).map_err(|_| invalid_number())?;
                TokenKind::Number(n as f64)
            }
            RawToken::DoubleQuoted | RawToken::SingleQuoted => {
                let body = &slice[1..slice.len() - 1];
                let text = unescape_string(body).map_err(|err| {
                    // +1 skips the opening quote.
                    let pos = span.start() + 1 + err.pos();
                    LexError {
                        kind: err.into(),
                        span: Span::new(pos, pos + 1),
                    }
                })?;
                TokenKind::String(text)
            }
            RawToken::Identifier => TokenKind::Identifier(slice.into()),
            other => match (other.operator(), other.punctuation()) {
                (Some(op), _) => TokenKind::Operator(op),
                (None, Some(ch)) => TokenKind::Punctuation(ch),
                (None, None) => unreachable!("every raw token is classified above"),
            },
        };
        Ok(Token::new(kind, span))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            None => {
                self.finished = true;
                let end = self.inner.source().len();
                Some(Ok(Token::new(TokenKind::End, Span::new(end, end))))
            }
            Some(Ok(raw)) => {
                let span = Span::from(self.inner.span());
                let token = self.convert(raw, span);
                if token.is_err() {
                    self.finished = true;
                }
                Some(token)
            }
            Some(Err(())) => {
                let span = Span::from(self.inner.span());
                let slice = self.inner.slice();
                let found = slice.chars().next().unwrap_or('\0');
                let kind = if found == '"' || found == '\'' {
                    LexErrorKind::UnterminatedString
                } else {
                    LexErrorKind::UnexpectedCharacter(found)
                };
                let start = span.start();
                self.error(kind, Span::new(start, start + found.len_utf8()))
            }
        }
    }
}

/// Tokenize the whole source eagerly.
///
/// The returned vector always ends with a [`TokenKind::End`] token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}
