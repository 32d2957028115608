//! Benchmarks for compiling and evaluating expressions.
//!
//! Run with: `cargo bench` in the core/ directory.
//!
//! Benchmark groups:
//! 1. eval_only: evaluation of an already compiled expression
//! 2. full_pipeline: compile + evaluate together
//! 3. local_functions: recursive local function calls

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tally_core::{Bindings, CompilationOptions, Registries, compile};

/// Generate an arithmetic expression like "x + x + ... + x" with `n` additions.
fn generate_arithmetic_chain(n: usize) -> String {
    let mut expr = String::from("x");
    for _ in 0..n {
        expr.push_str(" + x");
    }
    expr
}

/// Each `+` in a chain adds a tree level, so the longest chains need a
/// larger bound than the default. Benchmarks run on the main thread's stack.
fn chain_options() -> CompilationOptions {
    CompilationOptions {
        max_recursion_depth: 1_000,
        ..CompilationOptions::default()
    }
}

fn bench_eval_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval_only");
    let registries = Registries::default();
    let options = chain_options();
    let bindings = Bindings::new().with("x", 1);

    for size in [100, 200, 400, 800] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let source = generate_arithmetic_chain(size);
            let expr = compile(&source, &registries, &options).expect("compile failed");
            b.iter(|| black_box(expr.evaluate(black_box(&bindings)).expect("evaluation failed")));
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let registries = Registries::default();
    let options = chain_options();
    let bindings = Bindings::new().with("x", 1);

    for size in [100, 200, 400, 800] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let source = generate_arithmetic_chain(size);
            b.iter(|| {
                let expr = compile(black_box(&source), &registries, &options).expect("compile failed");
                black_box(expr.evaluate(&bindings).expect("evaluation failed"))
            });
        });
    }
    group.finish();
}

fn bench_local_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_functions");
    let expr = compile(
        "fib(n) = n < 2 ? n : fib(n - 1) + fib(n - 2); fib(n)",
        &Registries::default(),
        &CompilationOptions::default(),
    )
    .expect("compile failed");

    for n in [10, 15, 20] {
        let bindings = Bindings::new().with("n", n);
        group.bench_with_input(BenchmarkId::new("fib", n), &bindings, |b, bindings| {
            b.iter(|| black_box(expr.evaluate(bindings).expect("evaluation failed")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_eval_only, bench_full_pipeline, bench_local_functions);
criterion_main!(benches);
