//! Default registry contents.
//!
//! - Operators: arithmetic, comparison, logic, concatenation, membership and
//!   the named prefix operators (`sqrt x`, `abs x`, ...).
//! - Functions: `min`, `max`, `sum`, `hypot`, `pyt`, `pow`, `atan2`, `if`,
//!   `fac`, `gamma`, `roundTo`, `indexOf`, `join`.
//! - Constants: `E`, `PI`, `true`, `false`.
//!
//! Every default is deterministic. Hosts wanting randomness or clocks must
//! register those themselves.

pub mod math;
pub mod operators;
pub mod sequence;

#[cfg(test)]
mod operators_test;

use crate::{
    registry::{Function, Operator},
    values::Value,
    vm::RuntimeError,
};

/// Operator table installed by [`Registries::with_defaults`].
///
/// [`Registries::with_defaults`]: crate::Registries::with_defaults
pub fn default_operators() -> Vec<Operator> {
    let mut operators = operators::operators();
    operators.extend(math::prefix_operators());
    operators.push(sequence::length_operator());
    operators
}

/// Function table installed by [`Registries::with_defaults`].
///
/// [`Registries::with_defaults`]: crate::Registries::with_defaults
pub fn default_functions() -> Vec<Function> {
    let mut functions = math::functions();
    functions.extend(sequence::functions());
    functions.push(Function::fixed("if", 3, |args| {
        Ok(if args[0].is_truthy() {
            args[1].clone()
        } else {
            args[2].clone()
        })
    }));
    functions
}

/// Constant table installed by [`Registries::with_defaults`].
///
/// [`Registries::with_defaults`]: crate::Registries::with_defaults
pub fn default_constants() -> Vec<(&'static str, Value)> {
    vec![
        ("E", Value::Number(core::f64::consts::E)),
        ("PI", Value::Number(core::f64::consts::PI)),
        ("true", Value::Bool(true)),
        ("false", Value::Bool(false)),
    ]
}

// ============================================================================
// Argument helpers
// ============================================================================

pub(crate) fn expect_number(value: &Value) -> Result<f64, RuntimeError> {
    value
        .as_number()
        .ok_or_else(|| RuntimeError::type_mismatch("number", value))
}

pub(crate) fn expect_str(value: &Value) -> Result<&str, RuntimeError> {
    value
        .as_str()
        .ok_or_else(|| RuntimeError::type_mismatch("string", value))
}

pub(crate) fn expect_array(value: &Value) -> Result<&[Value], RuntimeError> {
    value
        .as_array()
        .ok_or_else(|| RuntimeError::type_mismatch("array", value))
}

/// Integral number that fits in `i32`, as used for digit counts.
pub(crate) fn expect_integer(value: &Value) -> Result<i32, RuntimeError> {
    let n = expect_number(value)?;
    if n.fract() != 0.0 || n.abs() > i32::MAX as f64 {
        return Err(RuntimeError::type_mismatch("integer", value));
    }
    Ok(n as i32)
}

/// Numeric arguments of a variadic function. A single array argument is
/// spread, so `max(1, 2, 3)` and `max([1, 2, 3])` agree.
pub(crate) fn numeric_args(args: &[Value]) -> Result<Vec<f64>, RuntimeError> {
    let items = match args {
        [Value::Array(items)] => items.as_slice(),
        _ => args,
    };
    items.iter().map(expect_number).collect()
}
