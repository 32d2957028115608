#[macro_use]
mod cases;

use indoc::indoc;
use tally::{Bindings, Error, ParseErrorKind};

test_case!(immediate_call, input: "(f(x) = x * x)(5)", value: 25);
test_case!(nested_calls, input: "f(x) = x + 1; f(f(1))", value: 3);
test_case!(definition_yields_null, input: "f(x) = x", value: Option::<f64>::None);
test_case!(
    recursion,
    input: "fact(n) = n <= 1 ? 1 : n * fact(n - 1); fact(10)",
    value: 3628800,
);
test_case!(
    parameters_shadow_bindings,
    input: "f(x) = x * 2; f(3) + x",
    bindings: [("x", 100)],
    value: 106,
);
test_case!(
    closes_over_defining_scope,
    input: "scale(k) = (apply(x) = x * k; apply(10)); scale(3)",
    value: 30,
);
test_case!(
    multi_line_program,
    input: indoc! {"
        area(w, h) = w * h;
        perimeter(w, h) = 2 * (w + h);
        area(width, height) + perimeter(width, height)
    "},
    bindings: [("width", 3), ("height", 4)],
    value: 26,
);
test_case!(wrong_argument_count, input: "f(x, y) = x; f(1)", error: Error::Parse(_));
test_case!(duplicate_parameter, input: "f(x, x) = x", error: Error::Parse(_));
test_case!(shadowing_a_registry_function, input: "max(x) = x; max(1)", error: Error::Parse(_));
test_case!(skipped_definition, input: "0 ? (f(x) = x) : 0; f(1)", error: Error::Evaluation(_));

#[test]
fn test_body_cannot_call_a_bound_name() {
    let bindings = Bindings::new().with("g", 1);
    match cases::eval("f(x) = g(x); f(1)", &bindings) {
        Err(Error::Parse(err)) => assert_eq!(err.kind, ParseErrorKind::UnknownFunction("g".into())),
        other => panic!("expected an unknown function error, got {:?}", other),
    }
}
