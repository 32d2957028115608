#![allow(dead_code)]

use once_cell::sync::Lazy;
use tally::{Bindings, CompilationOptions, Error, Registries, Value, compile};

/// Default registries shared by every test in a binary.
pub static REGISTRIES: Lazy<Registries> = Lazy::new(Registries::default);

/// Default options with membership enabled, so `in` parses.
pub static OPTIONS: Lazy<CompilationOptions> = Lazy::new(|| CompilationOptions {
    enable_membership: true,
    ..CompilationOptions::default()
});

pub fn eval(source: &str, bindings: &Bindings) -> Result<Value, Error> {
    compile(source, &REGISTRIES, &OPTIONS)?.evaluate(bindings)
}

/// Pairs of expressions that must evaluate identically with [`sample_bindings`].
pub static EQUIVALENT: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("a + b * c", "a + (b * c)"),
        ("a - b - c", "(a - b) - c"),
        ("a / b / c", "(a / b) / c"),
        ("a ^ b ^ 2", "a ^ (b ^ 2)"),
        ("-a ^ 2", "-(a ^ 2)"),
        ("sqrt a * b", "(sqrt a) * b"),
        ("a == b != c", "(a == b) != c"),
        ("a < b and b < c or c < a", "((a < b) and (b < c)) or (c < a)"),
        ("not a == b", "not (a == b)"),
        ("a > b ? a : b > c ? b : c", "a > b ? a : (b > c ? b : c)"),
        ("a ++ b * c", "a ++ (b * c)"),
        ("a in [a, b] and c", "(a in [a, b]) and c"),
    ]
});

pub fn sample_bindings() -> Bindings {
    Bindings::new().with("a", 2).with("b", 3).with("c", 5)
}

/// Declares a test that evaluates `input` and compares the outcome.
///
/// ```ignore
/// test_case!(name, input: "1 + 2", value: 3);
/// test_case!(name, input: "x * 2", bindings: [("x", 4)], value: 8);
/// test_case!(name, input: "1 / 0", error: Error::Evaluation(_));
/// ```
macro_rules! test_case {
    ($name:ident, input: $input:expr, value: $value:expr $(,)?) => {
        test_case!($name, input: $input, bindings: [], value: $value);
    };
    ($name:ident, input: $input:expr, bindings: [$(($key:expr, $bound:expr)),* $(,)?], value: $value:expr $(,)?) => {
        #[test]
        fn $name() {
            let bindings = tally::Bindings::new()$(.with($key, $bound))*;
            let result = crate::cases::eval($input, &bindings);
            pretty_assertions::assert_eq!(result, Ok(tally::Value::from($value)), "{}", $input);
        }
    };
    ($name:ident, input: $input:expr, error: $pattern:pat $(,)?) => {
        test_case!($name, input: $input, bindings: [], error: $pattern);
    };
    ($name:ident, input: $input:expr, bindings: [$(($key:expr, $bound:expr)),* $(,)?], error: $pattern:pat $(,)?) => {
        #[test]
        fn $name() {
            let bindings = tally::Bindings::new()$(.with($key, $bound))*;
            let result = crate::cases::eval($input, &bindings);
            assert!(matches!(result, Err($pattern)), "{}: got {:?}", $input, result);
        }
    };
}
