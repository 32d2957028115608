//! Operations over strings and arrays.

use ecow::EcoString;

use crate::{
    registry::{Function, Operator, Precedence},
    values::Value,
    vm::RuntimeError,
};

use super::{expect_array, expect_str};

/// Number of characters in a string or elements in an array.
pub fn length(value: &Value) -> Result<usize, RuntimeError> {
    match value {
        Value::Str(s) => Ok(s.chars().count()),
        Value::Array(items) => Ok(items.len()),
        other => Err(RuntimeError::type_mismatch("string or array", other)),
    }
}

/// `length x`, the prefix form of `x.length`.
pub fn length_operator() -> Operator {
    Operator::unary("length", Precedence::Prefix, |a| {
        Ok(Value::Number(length(a)? as f64))
    })
}

pub fn functions() -> Vec<Function> {
    vec![
        Function::fixed("indexOf", 2, |args| Ok(Value::Number(index_of(&args[0], &args[1])?))),
        Function::fixed("join", 2, |args| {
            let separator = expect_str(&args[0])?;
            Ok(Value::Str(join(separator, expect_array(&args[1])?)))
        }),
    ]
}

/// Position of `needle` in an array (by equality) or in a string (as a
/// substring, counted in characters). `-1` when absent.
fn index_of(needle: &Value, haystack: &Value) -> Result<f64, RuntimeError> {
    let position = match haystack {
        Value::Array(items) => items.iter().position(|item| item == needle),
        Value::Str(text) => {
            let needle = expect_str(needle)?;
            text.find(needle)
                .map(|byte_offset| text[..byte_offset].chars().count())
        }
        other => return Err(RuntimeError::type_mismatch("string or array", other)),
    };
    Ok(position.map_or(-1.0, |i| i as f64))
}

fn join(separator: &str, items: &[Value]) -> EcoString {
    let mut joined = EcoString::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            joined.push_str(separator);
        }
        joined.push_str(&item.to_text());
    }
    joined
}
