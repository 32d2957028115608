//! Expressions are untrusted input: nothing they contain may reach a
//! callable the host did not register.

#[macro_use]
mod cases;

use tally::{
    Bindings, CompilationOptions, Engine, EngineOptions, Error, Function, ParseErrorKind,
    Registries, Value, compile,
};

fn compile_error(source: &str, registries: &Registries) -> ParseErrorKind {
    match compile(source, registries, &CompilationOptions::default()) {
        Err(Error::Parse(err)) => err.kind,
        other => panic!("expected {:?} to be rejected, got {:?}", source, other),
    }
}

test_case!(bound_name_is_data, input: "exec", bindings: [("exec", "rm -rf /")], value: "rm -rf /");
test_case!(bound_name_is_not_callable, input: "exec(1)", bindings: [("exec", "rm -rf /")], error: Error::Parse(_));
test_case!(assigned_name_is_not_callable, input: "f = 1; f(2)", error: Error::Parse(_));
test_case!(constructor_member, input: "x.constructor", bindings: [("x", 1)], error: Error::Parse(_));
test_case!(proto_member, input: "[1].__proto__", error: Error::Parse(_));
test_case!(computed_callee, input: "[max][0](1)", error: Error::Parse(_));
test_case!(assignment_stays_local, input: "y = x; x = 2; y + x", bindings: [("x", 1)], value: 3);

#[test]
fn test_callable_resolution() {
    let registries = Registries::default();
    assert_eq!(compile_error("exec(1)", &registries), ParseErrorKind::UnknownFunction("exec".into()));
    assert_eq!(compile_error("x = 1; x(2)", &registries), ParseErrorKind::NotCallable("x".into()));
    assert_eq!(compile_error("max", &registries), ParseErrorKind::FunctionAsValue("max".into()));
    assert_eq!(
        compile_error("x.constructor", &registries),
        ParseErrorKind::ForbiddenMember("constructor".into())
    );
}

#[test]
fn test_bindings_cannot_shadow_registry_names() {
    // `PI` resolves to the registered constant whatever the host binds.
    let expr = compile("PI", &Registries::default(), &CompilationOptions::default()).unwrap();
    let bindings = Bindings::new().with("PI", 3);
    assert_eq!(expr.evaluate(&bindings).unwrap(), Value::Number(std::f64::consts::PI));
    assert_eq!(expr.free_variables().count(), 0);
}

#[test]
fn test_constants_are_read_only() {
    let registries = Registries::default();
    assert_eq!(compile_error("PI = 3", &registries), ParseErrorKind::IllegalAssignmentTarget);
    assert_eq!(compile_error("min = 3", &registries), ParseErrorKind::IllegalAssignmentTarget);
}

#[test]
fn test_registry_changes_after_compile() {
    let mut registries = Registries::default();
    let options = CompilationOptions::default();
    let before = compile("PI * r ^ 2", &registries, &options).unwrap();

    registries.set_constants([("PI", 3)]);
    let after = compile("PI * r ^ 2", &registries, &options).unwrap();

    let bindings = Bindings::new().with("r", 1);
    assert_eq!(before.evaluate(&bindings).unwrap(), Value::Number(std::f64::consts::PI));
    assert_eq!(after.evaluate(&bindings).unwrap(), Value::Number(3.0));
}

#[test]
fn test_removing_functions_after_compile() {
    let mut registries = Registries::default();
    let options = CompilationOptions::default();
    let expr = compile("max(1, 2) + sqrt 4", &registries, &options).unwrap();

    registries.remove_function("max");
    assert_eq!(expr.evaluate(&Bindings::new()).unwrap(), Value::Number(4.0));
    assert_eq!(
        compile_error("max(1, 2)", &registries),
        ParseErrorKind::UnknownFunction("max".into())
    );

    registries.clear_all();
    assert_eq!(expr.evaluate(&Bindings::new()).unwrap(), Value::Number(4.0));
    assert!(compile("max(1, 2) + sqrt 4", &registries, &options).is_err());
}

#[test]
fn test_restricted_engine() {
    let mut engine = Engine::new(EngineOptions::default());
    engine.registries_mut().set_functions([Function::fixed("clamp01", 1, |args| {
        let x = args[0].as_number().unwrap_or(0.0);
        Ok(Value::Number(x.clamp(0.0, 1.0)))
    })]);

    let expr = engine.compile("clamp01(x * 2)").unwrap();
    assert_eq!(expr.evaluate(&Bindings::new().with("x", 0.75)).unwrap(), Value::Number(1.0));

    for source in ["sqrt(4)", "max(1, 2)", "fac(3)"] {
        assert!(
            matches!(engine.compile(source), Err(Error::Parse(_))),
            "{} should not compile",
            source
        );
    }
}
