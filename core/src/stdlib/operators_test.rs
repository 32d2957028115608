use pretty_assertions::assert_eq;

use crate::{Bindings, CompilationOptions, Error, Registries, Value, compile, vm::RuntimeError};

fn eval(source: &str) -> Result<Value, Error> {
    compile(source, &Registries::default(), &CompilationOptions::default())?
        .evaluate(&Bindings::new())
}

fn value(source: &str) -> Value {
    eval(source).unwrap_or_else(|e| panic!("evaluating {:?} failed: {}", source, e))
}

fn runtime_error(source: &str) -> RuntimeError {
    match eval(source) {
        Err(Error::Evaluation(err)) => err.kind,
        other => panic!("expected an evaluation error for {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_arithmetic() {
    assert_eq!(value("10 / 4"), Value::Number(2.5));
    assert_eq!(value("-7 % 3"), Value::Number(-1.0));
    assert_eq!(value("2 ^ 0.5 ^ 2"), Value::Number(2f64.powf(0.25)));
    assert_eq!(value("+3"), Value::Number(3.0));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(runtime_error("1 / 0"), RuntimeError::DivisionByZero);
    assert_eq!(runtime_error("5 % 0"), RuntimeError::DivisionByZero);
}

#[test]
fn test_numeric_operators_reject_other_types() {
    assert_eq!(
        runtime_error("1 + true"),
        RuntimeError::TypeMismatch {
            expected: "number",
            found: "boolean",
        }
    );
    assert!(matches!(runtime_error("-'a'"), RuntimeError::TypeMismatch { .. }));
    assert!(matches!(runtime_error("[1] * 2"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn test_concatenation() {
    assert_eq!(value("'a' ++ 1"), Value::string("a1"));
    assert_eq!(value("1 ++ 2"), Value::string("12"));
    assert_eq!(value("[1] ++ [2, 3]"), Value::array([1.into(), 2.into(), 3.into()]));
    assert!(matches!(runtime_error("[1] ++ 2"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn test_equality_is_structural() {
    assert_eq!(value("[1, [2]] == [1, [2]]"), Value::Bool(true));
    assert_eq!(value("1 == '1'"), Value::Bool(false));
    assert_eq!(value("'a' != 'b'"), Value::Bool(true));
}

#[test]
fn test_relational() {
    assert_eq!(value("1 < 2"), Value::Bool(true));
    assert_eq!(value("2 <= 2"), Value::Bool(true));
    assert_eq!(value("'abc' < 'abd'"), Value::Bool(true));
    assert_eq!(value("sqrt -1 < 1"), Value::Bool(false));
    assert!(matches!(runtime_error("1 < 'a'"), RuntimeError::TypeMismatch { .. }));
    assert!(matches!(runtime_error("[1] > [0]"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn test_logic_and_aliases() {
    assert_eq!(value("not 0"), Value::Bool(true));
    assert_eq!(value("!1"), Value::Bool(false));
    assert_eq!(value("1 && 0"), Value::Bool(false));
    assert_eq!(value("0 || 'x'"), Value::Bool(true));
}

#[test]
fn test_if_evaluates_to_chosen_argument() {
    assert_eq!(value("if(1, 'a', 'b')"), Value::string("a"));
    assert_eq!(value("if('', 'a', 'b')"), Value::string("b"));
}
