//! Precedence-climbing recursive descent over the token stream.
//!
//! Grammar levels, loosest first:
//!
//! ```text
//!  1  a; b                   sequence (trailing `;` allowed)
//!  2  x = e   f(x) = e       assignment, local function definition (right)
//!  3  c ? a : b              conditional (right)
//!  4-12                      registry operators, by their precedence
//! 13  f(..)  a[i]  a.name    postfix
//! ```
//!
//! Levels 4-12 are not hard-coded: whether a token is a prefix or infix
//! operator, how tightly it binds and how it associates all come from the
//! registries. A prefix operator at level `p` takes an operand parsed at level
//! `p + 1`, which is what makes `-2 ^ 2` parse as `-(2 ^ 2)` and
//! `not a == b` as `not (a == b)`.

use std::sync::Arc;

use ecow::EcoString;

use crate::{
    api::{CompilationOptions, Error, ResourceLimitError, ResourceLimitKind},
    lexer::{Token, TokenKind, tokenize},
    registry::{Associativity, Operator, Precedence, Registries},
    syntax::Span,
};

use super::{Expr, Node, ParseError, ParseErrorKind};

/// Symbols the grammar itself owns; never looked up in the registries.
const GRAMMAR_SYMBOLS: &[&str] = &["=", "?", ":"];

/// Parse `source` into an AST, using `registries` to recognize operators.
///
/// # Example
///
/// ```
/// use tally_core::{CompilationOptions, Registries};
/// use tally_core::parser::{Expr, parse};
///
/// let ast = parse("1 + 2 * 3", &Registries::default(), &CompilationOptions::default()).unwrap();
/// assert!(matches!(ast.expr, Expr::Binary { ref op, .. } if op == "+"));
/// ```
pub fn parse(
    source: &str,
    registries: &Registries,
    options: &CompilationOptions,
) -> Result<Node, Error> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens, registries, options);
    let node = parser.parse_sequence()?;

    let next = parser.peek();
    if !next.is_end() {
        return Err(ParseError::new(
            ParseErrorKind::TrailingInput {
                found: next.kind.to_string().into(),
            },
            next.span.clone(),
        )
        .into());
    }
    Ok(node)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    registries: &'a Registries,
    options: &'a CompilationOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(
        mut tokens: Vec<Token>,
        registries: &'a Registries,
        options: &'a CompilationOptions,
    ) -> Self {
        if !tokens.last().is_some_and(Token::is_end) {
            let end = tokens.last().map_or(0, |t| t.span.end());
            tokens.push(Token::new(TokenKind::End, Span::new(end, end)));
        }
        Self {
            tokens,
            position: 0,
            registries,
            options,
            depth: 0,
        }
    }

    // === Token cursor ===

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    /// Consume the current token. The final `End` token is never consumed.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if !token.is_end() {
            self.position += 1;
        }
        token
    }

    fn eat_punctuation(&mut self, ch: char) -> Option<Token> {
        self.peek().is_punctuation(ch).then(|| self.advance())
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.peek();
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected,
                found: token.kind.to_string().into(),
            },
            token.span.clone(),
        )
    }

    /// Consume the closing delimiter matching `open`, or report it missing.
    fn expect_closing(
        &mut self,
        open: &Token,
        close: char,
        expected: &'static str,
    ) -> Result<Token, ParseError> {
        if let Some(token) = self.eat_punctuation(close) {
            return Ok(token);
        }
        if self.peek().is_end() {
            let delimiter = match open.kind {
                TokenKind::Punctuation(ch) => ch,
                _ => close,
            };
            let span = self.peek().span.clone();
            return Err(ParseError::unclosed(delimiter, span, open.span.clone()));
        }
        Err(self.unexpected(expected))
    }

    /// Run `parse` one syntactic level deeper, failing closed once the
    /// configured depth is exceeded.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth >= self.options.max_recursion_depth {
            return Err(ResourceLimitError::new(
                ResourceLimitKind::NestingDepth {
                    limit: self.options.max_recursion_depth,
                },
                self.peek().span.clone(),
            )
            .into());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Build a composite node, failing closed once the tree grows taller
    /// than the configured depth. Left-associative folds and postfix chains
    /// deepen the tree without recursing, so `nested` alone cannot bound it.
    fn node(&self, expr: Expr, span: Span) -> Result<Node, Error> {
        let node = Node::new(expr, span);
        if node.height() > self.options.max_recursion_depth {
            return Err(ResourceLimitError::new(
                ResourceLimitKind::NestingDepth {
                    limit: self.options.max_recursion_depth,
                },
                node.span,
            )
            .into());
        }
        Ok(node)
    }

    // === Operator lookup ===

    /// The registered prefix operator at the cursor, if any.
    fn prefix_operator(&self) -> Option<Arc<Operator>> {
        match &self.peek().kind {
            TokenKind::Operator(symbol) => self.registries.unary_operator(symbol).cloned(),
            TokenKind::Identifier(name) => self.registries.unary_operator(name).cloned(),
            _ => None,
        }
    }

    /// The registered infix operator at the cursor, if any.
    ///
    /// A symbolic operator in infix position that has no binary registry
    /// entry is an error rather than the end of the expression.
    fn infix_operator(&self) -> Result<Option<Arc<Operator>>, ParseError> {
        let token = self.peek();
        let operator = match &token.kind {
            TokenKind::Operator(symbol) if GRAMMAR_SYMBOLS.contains(symbol) => return Ok(None),
            TokenKind::Operator(symbol) => match self.registries.binary_operator(symbol) {
                Some(operator) => operator,
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnknownOperator((*symbol).into()),
                        token.span.clone(),
                    ));
                }
            },
            TokenKind::Identifier(name) => match self.registries.binary_operator(name) {
                Some(operator) => operator,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        if operator.precedence() == Precedence::Membership && !self.options.enable_membership {
            return Err(ParseError::new(
                ParseErrorKind::DisabledFeature("membership test"),
                token.span.clone(),
            ));
        }
        Ok(Some(operator.clone()))
    }

    // === Grammar ===

    /// Level 1: `a; b; c`.
    fn parse_sequence(&mut self) -> Result<Node, Error> {
        let first = self.parse_assignment()?;
        if !self.peek().is_punctuation(';') {
            return Ok(first);
        }

        let mut statements = vec![first];
        while self.eat_punctuation(';').is_some() {
            let next = self.peek();
            if next.is_end() || next.is_punctuation(')') {
                break;
            }
            statements.push(self.parse_assignment()?);
        }

        if statements.len() == 1 {
            return Ok(statements.remove(0));
        }
        let span = Span::combine(&statements[0].span, &statements[statements.len() - 1].span);
        self.node(Expr::Sequence(statements), span)
    }

    /// Level 2: `name = value` and `f(x, y) = body`, right-associative.
    fn parse_assignment(&mut self) -> Result<Node, Error> {
        let target = self.parse_conditional()?;
        if !self.peek().is_operator("=") {
            return Ok(target);
        }
        self.advance();

        let value = self.nested(Self::parse_assignment)?;
        let span = Span::combine(&target.span, &value.span);
        let value = Box::new(value);

        match target.expr {
            Expr::Identifier(name) => {
                if !self.options.enable_assignment {
                    return Err(disabled("assignment", target.span));
                }
                self.node(Expr::Assign { name, value }, span)
            }
            Expr::Call { callee, args } => {
                let callee = *callee;
                let Expr::Identifier(name) = callee.expr else {
                    return Err(illegal_target(callee.span));
                };
                if !self.options.enable_local_function_definition {
                    return Err(disabled("local function definition", target.span));
                }
                let params = parameters(args)?;
                self.node(Expr::FunctionDef { name, params, body: value }, span)
            }
            _ => Err(illegal_target(target.span)),
        }
    }

    /// Level 3: `condition ? then : else`, right-associative.
    fn parse_conditional(&mut self) -> Result<Node, Error> {
        let condition = self.parse_binary(Precedence::Or.level())?;
        if !self.peek().is_operator("?") {
            return Ok(condition);
        }
        self.advance();

        let then_branch = self.nested(Self::parse_conditional)?;
        if !self.peek().is_operator(":") {
            return Err(self.unexpected("`:`").into());
        }
        self.advance();
        let else_branch = self.nested(Self::parse_conditional)?;

        let span = Span::combine(&condition.span, &else_branch.span);
        self.node(
            Expr::Conditional {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        )
    }

    /// Levels 4-12: infix operators binding at least as tightly as `min_level`.
    fn parse_binary(&mut self, min_level: u8) -> Result<Node, Error> {
        let mut left = self.parse_unary()?;

        while let Some(operator) = self.infix_operator()? {
            let level = operator.precedence().level();
            if level < min_level {
                break;
            }
            self.advance();

            let next_level = match operator.associativity() {
                Associativity::Left => level + 1,
                Associativity::Right => level,
            };
            let right = self.nested(|p| p.parse_binary(next_level))?;
            let span = Span::combine(&left.span, &right.span);
            left = self.node(
                Expr::Binary {
                    op: operator.symbol().into(),
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            )?;
        }
        Ok(left)
    }

    /// Prefix operators, then a postfix chain. Operands, parenthesized
    /// groups, array elements and arguments all nest through here.
    fn parse_unary(&mut self) -> Result<Node, Error> {
        self.nested(|p| match p.prefix_operator() {
            Some(operator) => {
                let op_token = p.advance();
                let operand = p.parse_binary(operator.precedence().level() + 1)?;
                let span = Span::combine(&op_token.span, &operand.span);
                p.node(
                    Expr::Unary {
                        op: operator.symbol().into(),
                        operand: Box::new(operand),
                    },
                    span,
                )
            }
            None => {
                let primary = p.parse_primary()?;
                p.parse_postfix(primary)
            }
        })
    }

    fn parse_primary(&mut self) -> Result<Node, Error> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Node::new(Expr::Number(*n), token.span))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Node::new(Expr::Str(s.clone()), token.span))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::new(Expr::Identifier(name.clone()), token.span))
            }
            TokenKind::Punctuation('(') => {
                self.advance();
                let inner = self.parse_sequence()?;
                self.expect_closing(&token, ')', "`)`")?;
                Ok(inner)
            }
            TokenKind::Punctuation('[') => {
                self.advance();
                let (elements, close) = self.parse_list(&token, ']', "`,` or `]`")?;
                self.node(Expr::Array(elements), Span::combine(&token.span, &close.span))
            }
            TokenKind::Operator(symbol)
                if !GRAMMAR_SYMBOLS.contains(symbol)
                    && self.registries.binary_operator(symbol).is_none() =>
            {
                Err(ParseError::new(
                    ParseErrorKind::UnknownOperator((*symbol).into()),
                    token.span,
                )
                .into())
            }
            _ => Err(self.unexpected("expression").into()),
        }
    }

    /// Level 13: calls, indexing and member access, left to right.
    fn parse_postfix(&mut self, mut node: Node) -> Result<Node, Error> {
        loop {
            let token = self.peek().clone();
            node = if token.is_punctuation('(') {
                self.advance();
                let (args, close) = self.parse_list(&token, ')', "`,` or `)`")?;
                let span = Span::combine(&node.span, &close.span);
                self.node(
                    Expr::Call {
                        callee: Box::new(node),
                        args,
                    },
                    span,
                )?
            } else if token.is_punctuation('[') {
                self.advance();
                let index = self.parse_assignment()?;
                let close = self.expect_closing(&token, ']', "`]`")?;
                let span = Span::combine(&node.span, &close.span);
                self.node(
                    Expr::Index {
                        target: Box::new(node),
                        index: Box::new(index),
                    },
                    span,
                )?
            } else if token.is_punctuation('.') {
                if !self.options.enable_member_access {
                    return Err(disabled("member access", token.span));
                }
                self.advance();
                let Some(name) = self.peek().as_identifier().cloned() else {
                    return Err(self.unexpected("member name").into());
                };
                let name_token = self.advance();
                let span = Span::combine(&node.span, &name_token.span);
                self.node(
                    Expr::Member {
                        target: Box::new(node),
                        name,
                    },
                    span,
                )?
            } else {
                return Ok(node);
            };
        }
    }

    /// Comma-separated expressions up to `close`. The opening delimiter has
    /// already been consumed.
    fn parse_list(
        &mut self,
        open: &Token,
        close: char,
        expected: &'static str,
    ) -> Result<(Vec<Node>, Token), Error> {
        let mut items = Vec::new();
        if let Some(token) = self.eat_punctuation(close) {
            return Ok((items, token));
        }
        loop {
            items.push(self.parse_assignment()?);
            if self.eat_punctuation(',').is_none() {
                let token = self.expect_closing(open, close, expected)?;
                return Ok((items, token));
            }
        }
    }
}

fn disabled(feature: &'static str, span: Span) -> Error {
    ParseError::new(ParseErrorKind::DisabledFeature(feature), span).into()
}

fn illegal_target(span: Span) -> Error {
    ParseError::new(ParseErrorKind::IllegalAssignmentTarget, span).into()
}

/// Parameter names of `f(a, b) = ...`: distinct plain identifiers.
fn parameters(args: Vec<Node>) -> Result<Vec<EcoString>, Error> {
    let mut params: Vec<EcoString> = Vec::with_capacity(args.len());
    for arg in args {
        let Expr::Identifier(name) = arg.expr else {
            return Err(illegal_target(arg.span));
        };
        if params.contains(&name) {
            let kind = ParseErrorKind::DuplicateParameter(name);
            return Err(ParseError::new(kind, arg.span).into());
        }
        params.push(name);
    }
    Ok(params)
}
