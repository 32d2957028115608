//! Symbolic and keyword operators.

use core::cmp::Ordering;

use crate::{
    registry::{Associativity, Junction, Operator, Precedence},
    values::Value,
    vm::RuntimeError,
};

use super::{expect_array, expect_number};

pub fn operators() -> Vec<Operator> {
    use Associativity::{Left, Right};

    let and = Operator::short_circuit("and", Precedence::And, Junction::And);
    let or = Operator::short_circuit("or", Precedence::Or, Junction::Or);
    let not = Operator::unary("not", Precedence::Not, |a| Ok(Value::Bool(!a.is_truthy())));

    vec![
        // Logic
        and.alias("&&"),
        and,
        or.alias("||"),
        or,
        not.alias("!"),
        not,
        // Membership (parsed only when enabled)
        Operator::binary("in", Precedence::Membership, Left, contains),
        // Comparison
        Operator::binary("==", Precedence::Comparison, Left, |a, b| Ok(Value::Bool(a == b))),
        Operator::binary("!=", Precedence::Comparison, Left, |a, b| Ok(Value::Bool(a != b))),
        Operator::binary("<", Precedence::Comparison, Left, |a, b| {
            relational(a, b, Ordering::is_lt)
        }),
        Operator::binary("<=", Precedence::Comparison, Left, |a, b| {
            relational(a, b, Ordering::is_le)
        }),
        Operator::binary(">", Precedence::Comparison, Left, |a, b| {
            relational(a, b, Ordering::is_gt)
        }),
        Operator::binary(">=", Precedence::Comparison, Left, |a, b| {
            relational(a, b, Ordering::is_ge)
        }),
        // Additive
        Operator::binary("+", Precedence::Additive, Left, |a, b| arithmetic(a, b, |x, y| x + y)),
        Operator::binary("-", Precedence::Additive, Left, |a, b| arithmetic(a, b, |x, y| x - y)),
        Operator::binary("++", Precedence::Additive, Left, concat),
        // Multiplicative
        Operator::binary("*", Precedence::Multiplicative, Left, |a, b| {
            arithmetic(a, b, |x, y| x * y)
        }),
        Operator::binary("/", Precedence::Multiplicative, Left, |a, b| {
            checked_division(a, b, |x, y| x / y)
        }),
        Operator::binary("%", Precedence::Multiplicative, Left, |a, b| {
            checked_division(a, b, |x, y| x % y)
        }),
        // Prefix
        Operator::unary("-", Precedence::Prefix, |a| Ok(Value::Number(-expect_number(a)?))),
        Operator::unary("+", Precedence::Prefix, |a| Ok(Value::Number(expect_number(a)?))),
        // Exponent
        Operator::binary("^", Precedence::Exponent, Right, |a, b| {
            arithmetic(a, b, f64::powf)
        }),
    ]
}

fn arithmetic(a: &Value, b: &Value, f: impl Fn(f64, f64) -> f64) -> Result<Value, RuntimeError> {
    Ok(Value::Number(f(expect_number(a)?, expect_number(b)?)))
}

fn checked_division(
    a: &Value,
    b: &Value,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    let (x, y) = (expect_number(a)?, expect_number(b)?);
    if y == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Number(f(x, y)))
}

/// Orders two numbers or two strings. NaN compares false against everything.
fn relational(a: &Value, b: &Value, test: fn(Ordering) -> bool) -> Result<Value, RuntimeError> {
    let ordering = match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::Number(_) | Value::Str(_), other) => {
            return Err(RuntimeError::type_mismatch(a.type_name(), other));
        }
        (other, _) => return Err(RuntimeError::type_mismatch("number or string", other)),
    };
    Ok(Value::Bool(ordering.is_some_and(test)))
}

/// `a ++ b`: arrays concatenate, anything else joins textual forms.
fn concat(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            let mut joined = x.clone();
            joined.extend(y.iter().cloned());
            Ok(Value::Array(joined))
        }
        (Value::Array(_), other) | (other, Value::Array(_)) => {
            Err(RuntimeError::type_mismatch("array", other))
        }
        _ => {
            let mut text = a.to_text();
            text.push_str(&b.to_text());
            Ok(Value::Str(text))
        }
    }
}

fn contains(needle: &Value, haystack: &Value) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(expect_array(haystack)?.contains(needle)))
}
