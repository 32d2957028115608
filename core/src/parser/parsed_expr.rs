use ecow::EcoString;

use crate::syntax::Span;

/// An expression together with the source range it was parsed from.
///
/// Equality ignores spans and heights, so `a + (b * c)` and `a + b * c`
/// compare equal.
#[derive(Debug, Clone)]
pub struct Node {
    pub expr: Expr,
    pub span: Span,
    height: usize,
}

impl Node {
    pub fn new(expr: Expr, span: Span) -> Self {
        let height = 1 + expr.children().map(Node::height).max().unwrap_or(0);
        Self { expr, span, height }
    }

    /// Levels in the tree rooted here; a leaf has height 1.
    ///
    /// Compiling and dropping a node recurse this deep.
    pub fn height(&self) -> usize {
        self.height
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(EcoString),
    Identifier(EcoString),
    Array(Vec<Node>),
    /// Prefix operator application, by registry symbol.
    Unary {
        op: EcoString,
        operand: Box<Node>,
    },
    /// Binary operator application, by registry symbol.
    Binary {
        op: EcoString,
        left: Box<Node>,
        right: Box<Node>,
    },
    Conditional {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Index {
        target: Box<Node>,
        index: Box<Node>,
    },
    Member {
        target: Box<Node>,
        name: EcoString,
    },
    Assign {
        name: EcoString,
        value: Box<Node>,
    },
    FunctionDef {
        name: EcoString,
        params: Vec<EcoString>,
        body: Box<Node>,
    },
    /// `a; b; c`, evaluating to the last statement.
    Sequence(Vec<Node>),
}

impl Expr {
    /// Direct subexpressions, in source order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        let none: &[Node] = &[];
        let (boxed, list): ([Option<&Node>; 3], &[Node]) = match self {
            Expr::Number(_) | Expr::Str(_) | Expr::Identifier(_) => ([None; 3], none),
            Expr::Array(items) | Expr::Sequence(items) => ([None; 3], items.as_slice()),
            Expr::Unary { operand, .. } => ([Some(&**operand), None, None], none),
            Expr::Binary { left, right, .. } => ([Some(&**left), Some(&**right), None], none),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => (
                [Some(&**condition), Some(&**then_branch), Some(&**else_branch)],
                none,
            ),
            Expr::Call { callee, args } => ([Some(&**callee), None, None], args.as_slice()),
            Expr::Index { target, index } => ([Some(&**target), Some(&**index), None], none),
            Expr::Member { target, .. } => ([Some(&**target), None, None], none),
            Expr::Assign { value, .. } => ([Some(&**value), None, None], none),
            Expr::FunctionDef { body, .. } => ([Some(&**body), None, None], none),
        };
        boxed.into_iter().flatten().chain(list)
    }
}
