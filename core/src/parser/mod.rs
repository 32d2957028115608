//! Parser: token stream to AST.
//!
//! The parser consults the registries only to classify operators and their
//! binding power. Name resolution happens later, in the compiler.

mod error;
mod parsed_expr;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parsed_expr::{Expr, Node};
pub use parser::parse;


#[cfg(test)]
mod precedence_test;
