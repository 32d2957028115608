use core::fmt;
use std::sync::Arc;

use ecow::EcoString;

use crate::{values::Value, vm::RuntimeError};

pub type UnaryFn = Arc<dyn Fn(&Value) -> Result<Value, RuntimeError> + Send + Sync>;
pub type BinaryFn = Arc<dyn Fn(&Value, &Value) -> Result<Value, RuntimeError> + Send + Sync>;

/// Binding power of an operator, lowest to highest.
///
/// The discriminants follow the full grammar table. Levels 1-3 (statement
/// sequence, assignment, conditional) and 13 (postfix call/index/member) are
/// fixed grammar forms and cannot be assigned to registry operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Precedence {
    Or = 4,
    And = 5,
    Not = 6,
    Membership = 7,
    Comparison = 8,
    Additive = 9,
    Multiplicative = 10,
    Prefix = 11,
    Exponent = 12,
}

impl Precedence {
    /// Numeric level in the grammar table.
    pub(crate) fn level(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
}

/// Short-circuiting logical connective. Only the left operand is always
/// evaluated; the result is a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Junction {
    And,
    Or,
}

#[derive(Clone)]
pub enum OperatorFn {
    Unary(UnaryFn),
    Binary(BinaryFn),
    ShortCircuit(Junction),
}

/// An operator registry entry.
///
/// # Example
///
/// ```
/// use tally_core::registry::{Associativity, Operator, Precedence};
/// use tally_core::Value;
///
/// // `3 mean 5` evaluates to 4
/// let mean = Operator::binary("mean", Precedence::Multiplicative, Associativity::Left, |a, b| {
///     Ok(Value::Number((a.as_number().unwrap_or(0.0) + b.as_number().unwrap_or(0.0)) / 2.0))
/// });
/// assert_eq!(mean.symbol(), "mean");
/// ```
#[derive(Clone)]
pub struct Operator {
    symbol: EcoString,
    precedence: Precedence,
    associativity: Associativity,
    implementation: OperatorFn,
}

impl Operator {
    pub fn unary<F>(symbol: impl Into<EcoString>, precedence: Precedence, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self {
            symbol: symbol.into(),
            precedence,
            associativity: Associativity::Right,
            implementation: OperatorFn::Unary(Arc::new(f)),
        }
    }

    pub fn binary<F>(
        symbol: impl Into<EcoString>,
        precedence: Precedence,
        associativity: Associativity,
        f: F,
    ) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self {
            symbol: symbol.into(),
            precedence,
            associativity,
            implementation: OperatorFn::Binary(Arc::new(f)),
        }
    }

    pub fn short_circuit(
        symbol: impl Into<EcoString>,
        precedence: Precedence,
        junction: Junction,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            precedence,
            associativity: Associativity::Left,
            implementation: OperatorFn::ShortCircuit(junction),
        }
    }

    /// Same entry under another symbol, e.g. `&&` for `and`.
    pub fn alias(&self, symbol: impl Into<EcoString>) -> Self {
        Self {
            symbol: symbol.into(),
            ..self.clone()
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn associativity(&self) -> Associativity {
        self.associativity
    }

    pub fn implementation(&self) -> &OperatorFn {
        &self.implementation
    }

    pub fn arity(&self) -> Arity {
        match self.implementation {
            OperatorFn::Unary(_) => Arity::Unary,
            OperatorFn::Binary(_) | OperatorFn::ShortCircuit(_) => Arity::Binary,
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("symbol", &self.symbol)
            .field("precedence", &self.precedence)
            .field("associativity", &self.associativity)
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}
