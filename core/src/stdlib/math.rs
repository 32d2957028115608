//! Numeric prefix operators and math functions.

use core::f64::consts::PI;

use crate::{
    registry::{Function, Operator, Precedence},
    values::Value,
    vm::RuntimeError,
};

use super::{expect_integer, expect_number, numeric_args};

// ============================================================================
// Prefix operators
// ============================================================================

/// Round half away from zero.
fn round(x: f64) -> f64 {
    x.round()
}

/// Sign of `x`; zero and NaN map to themselves.
fn sign(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() { x } else { x.signum() }
}

const PREFIX_FUNCTIONS: &[(&str, fn(f64) -> f64)] = &[
    ("abs", f64::abs),
    ("acos", f64::acos),
    ("acosh", f64::acosh),
    ("asin", f64::asin),
    ("asinh", f64::asinh),
    ("atan", f64::atan),
    ("atanh", f64::atanh),
    ("cbrt", f64::cbrt),
    ("ceil", f64::ceil),
    ("cos", f64::cos),
    ("cosh", f64::cosh),
    ("exp", f64::exp),
    ("expm1", f64::exp_m1),
    ("floor", f64::floor),
    ("ln", f64::ln),
    ("log", f64::ln),
    ("log10", f64::log10),
    ("log1p", f64::ln_1p),
    ("log2", f64::log2),
    ("round", round),
    ("sign", sign),
    ("sin", f64::sin),
    ("sinh", f64::sinh),
    ("sqrt", f64::sqrt),
    ("tan", f64::tan),
    ("tanh", f64::tanh),
    ("trunc", f64::trunc),
];

/// Named prefix operators such as `sqrt x`. They bind like unary minus, so
/// `sqrt x ^ 2` is `sqrt(x ^ 2)`.
pub fn prefix_operators() -> Vec<Operator> {
    PREFIX_FUNCTIONS
        .iter()
        .map(|&(name, f)| {
            Operator::unary(name, Precedence::Prefix, move |a| {
                Ok(Value::Number(f(expect_number(a)?)))
            })
        })
        .collect()
}

// ============================================================================
// Functions
// ============================================================================

pub fn functions() -> Vec<Function> {
    vec![
        Function::variadic("min", 1, |args| extremum("min", args, f64::min)),
        Function::variadic("max", 1, |args| extremum("max", args, f64::max)),
        Function::variadic("sum", 1, |args| {
            Ok(Value::Number(numeric_args(args)?.into_iter().sum()))
        }),
        hypot("hypot"),
        hypot("pyt"),
        Function::fixed("pow", 2, |args| {
            Ok(Value::Number(expect_number(&args[0])?.powf(expect_number(&args[1])?)))
        }),
        Function::fixed("atan2", 2, |args| {
            Ok(Value::Number(expect_number(&args[0])?.atan2(expect_number(&args[1])?)))
        }),
        Function::fixed("fac", 1, |args| Ok(Value::Number(factorial(&args[0])?))),
        Function::fixed("gamma", 1, |args| {
            Ok(Value::Number(gamma(expect_number(&args[0])?)?))
        }),
        Function::fixed("roundTo", 2, |args| {
            let x = expect_number(&args[0])?;
            let digits = expect_integer(&args[1])?;
            Ok(Value::Number(round_to(x, digits)))
        }),
    ]
}

fn extremum(
    name: &str,
    args: &[Value],
    pick: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    numeric_args(args)?
        .into_iter()
        .reduce(pick)
        .map(Value::Number)
        .ok_or_else(|| RuntimeError::domain(ecow::eco_format!("{} of an empty array", name)))
}

/// Euclidean norm of the arguments, under two names.
fn hypot(name: &'static str) -> Function {
    Function::variadic(name, 0, |args| {
        let norm = numeric_args(args)?
            .into_iter()
            .fold(0.0, |acc: f64, x| acc.hypot(x));
        Ok(Value::Number(norm))
    })
}

fn round_to(x: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (x * scale).round() / scale
}

/// `n!` for non-negative integers. Overflows to infinity past 170.
fn factorial(value: &Value) -> Result<f64, RuntimeError> {
    let n = expect_number(value)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(RuntimeError::domain(ecow::eco_format!(
            "fac expects a non-negative integer, got {}",
            value
        )));
    }
    if n > 170.0 {
        return Ok(f64::INFINITY);
    }
    Ok((2..=n as u32).fold(1.0, |acc, k| acc * k as f64))
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Gamma function. Exact on positive integers, Lanczos approximation
/// elsewhere, undefined on zero and the negative integers.
fn gamma(x: f64) -> Result<f64, RuntimeError> {
    if x.fract() == 0.0 {
        if x <= 0.0 {
            return Err(RuntimeError::domain(
                "gamma is undefined for zero and negative integers",
            ));
        }
        return factorial(&Value::Number(x - 1.0));
    }
    Ok(lanczos(x))
}

fn lanczos(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula.
        return PI / ((PI * x).sin() * lanczos(1.0 - x));
    }
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + i as f64));
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * series
}
