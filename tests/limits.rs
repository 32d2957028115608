//! Feature toggles and resource bounds.

#[macro_use]
mod cases;

use std::thread;

use tally::{
    Bindings, CompilationOptions, Engine, EngineOptions, Error, ExecutionOptions, ParseErrorKind,
    Registries, ResourceLimitKind, Value, compile,
};

fn compile_with(source: &str, options: &CompilationOptions) -> Result<tally::CompiledExpression, Error> {
    compile(source, &Registries::default(), options)
}

fn resource_limit(result: Result<impl std::fmt::Debug, Error>) -> ResourceLimitKind {
    match result {
        Err(Error::ResourceLimit(err)) => err.kind,
        other => panic!("expected a resource limit error, got {:?}", other),
    }
}

test_case!(membership_when_enabled, input: "'b' in ['a', 'b']", value: true);

#[test]
fn test_membership_is_off_by_default() {
    assert!(matches!(
        compile_with("1 in [1]", &CompilationOptions::default()),
        Err(Error::Parse(_))
    ));
}

#[test]
fn test_disabled_features() {
    let options = CompilationOptions {
        enable_assignment: false,
        enable_local_function_definition: false,
        enable_member_access: false,
        ..CompilationOptions::default()
    };
    for source in ["x = 1", "f(x) = x", "[1].length"] {
        match compile_with(source, &options) {
            Err(Error::Parse(err)) => {
                assert!(matches!(err.kind, ParseErrorKind::DisabledFeature(_)), "{}", source)
            }
            other => panic!("{} should be rejected, got {:?}", source, other),
        }
    }
    assert!(compile_with("x == 1", &options).is_ok());
}

/// Runs `f` on a thread with a 2 MiB stack, the default for spawned threads.
fn on_small_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_nesting_depth() {
    on_small_stack(|| {
        let options = CompilationOptions::default();
        let deepest = format!("{}1{}", "(".repeat(99), ")".repeat(99));
        assert_eq!(
            compile_with(&deepest, &options).unwrap().evaluate(&Bindings::new()).unwrap(),
            Value::Number(1.0)
        );

        let too_deep = format!("{}1{}", "(".repeat(101), ")".repeat(101));
        assert_eq!(
            resource_limit(compile_with(&too_deep, &options)),
            ResourceLimitKind::NestingDepth { limit: 100 }
        );
    });
}

#[test]
fn test_longest_accepted_chains() {
    on_small_stack(|| {
        let options = CompilationOptions::default();
        let sum = format!("1{}", " + 1".repeat(99));
        let expr = compile_with(&sum, &options).unwrap();
        assert_eq!(expr.evaluate(&Bindings::new()).unwrap(), Value::Number(100.0));

        for source in [format!("a{}", "[0]".repeat(99)), format!("[1]{}", ".length".repeat(98))] {
            assert!(compile_with(&source, &options).is_ok(), "{}", source);
        }
    });
}

#[test]
fn test_long_chains_fail_closed() {
    on_small_stack(|| {
        let options = CompilationOptions::default();
        let chains = [
            format!("1{}", " + 1".repeat(4_999)),
            format!("a{}", "[0]".repeat(4_999)),
            format!("[1]{}", ".length".repeat(4_999)),
            format!("2{}", " ^ 2".repeat(4_999)),
            format!("{}1", "-".repeat(4_999)),
        ];
        for source in chains {
            assert_eq!(
                resource_limit(compile_with(&source, &options)),
                ResourceLimitKind::NestingDepth { limit: 100 }
            );
        }
    });
}

#[test]
fn test_default_call_depth_fails_closed() {
    on_small_stack(|| {
        let expr = compile_with(
            "f(n) = n > 0 ? f(n - 1) : 'done'; f(n)",
            &CompilationOptions::default(),
        )
        .unwrap();
        let deepest = Bindings::new().with("n", 127);
        assert_eq!(expr.evaluate(&deepest).unwrap(), Value::string("done"));

        let too_deep = Bindings::new().with("n", 10_000);
        assert_eq!(
            resource_limit(expr.evaluate(&too_deep)),
            ResourceLimitKind::CallDepth { limit: 128 }
        );
    });
}

#[test]
fn test_instruction_count() {
    let options = CompilationOptions {
        max_instruction_count: 500,
        ..CompilationOptions::default()
    };
    let items = vec!["1"; 1000].join(", ");
    let source = format!("[{}]", items);
    assert_eq!(
        resource_limit(compile_with(&source, &options)),
        ResourceLimitKind::InstructionCount { limit: 500 }
    );
}

#[test]
fn test_call_depth() {
    let options = EngineOptions {
        default_execution_options: ExecutionOptions {
            max_depth: 64,
            ..ExecutionOptions::default()
        },
        ..EngineOptions::default()
    };
    let expr = Engine::new(options).compile("f(n) = f(n + 1); f(0)").unwrap();
    assert_eq!(
        resource_limit(expr.evaluate(&Bindings::new())),
        ResourceLimitKind::CallDepth { limit: 64 }
    );
}

#[test]
fn test_step_budget() {
    let expr = compile_with(
        "fib(n) = n < 2 ? n : fib(n - 1) + fib(n - 2); fib(n)",
        &CompilationOptions::default(),
    )
    .unwrap();
    let tight = ExecutionOptions {
        max_steps: 10_000,
        ..ExecutionOptions::default()
    };

    let small = Bindings::new().with("n", 5);
    assert!(expr.evaluate_with_options(&small, &tight).is_ok());

    let large = Bindings::new().with("n", 25);
    assert_eq!(
        resource_limit(expr.evaluate_with_options(&large, &tight)),
        ResourceLimitKind::Steps { limit: 10_000 }
    );
}
