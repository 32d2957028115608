use pretty_assertions::assert_eq;

use super::{Node, parse};
use crate::{CompilationOptions, Registries};

// Helper function to parse an expression and return the AST.
//
// We test precedence by comparing whether two expressions parenthesized in
// different ways yield the same AST.
fn ast(source: &str) -> Node {
    let options = CompilationOptions {
        enable_membership: true,
        ..CompilationOptions::default()
    };
    parse(source, &Registries::default(), &options)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e))
}

#[test]
fn test_addition_vs_subtraction() {
    assert_eq!(ast("a + b - c"), ast("(a + b) - c"));
    assert_eq!(ast("a - b + c"), ast("(a - b) + c"));
    assert_eq!(
        ast("a + b - c + d - e + f"),
        ast("((((a + b) - c) + d) - e) + f")
    );
}

#[test]
fn test_multiplication_vs_division() {
    assert_eq!(ast("a * b / c"), ast("(a * b) / c"));
    assert_eq!(ast("a / b % c"), ast("(a / b) % c"));
}

#[test]
fn test_addition_vs_multiplication() {
    assert_eq!(ast("a + b * c"), ast("a + (b * c)"));
    assert_eq!(ast("a * b + c"), ast("(a * b) + c"));
    assert_eq!(ast("a ++ b * c"), ast("a ++ (b * c)"));
}

#[test]
fn test_and_vs_or() {
    assert_eq!(ast("a and b or c"), ast("(a and b) or c"));
    assert_eq!(ast("a or b and c"), ast("a or (b and c)"));
    assert_eq!(ast("a || b && c"), ast("a || (b && c)"));
}

#[test]
fn test_not_vs_comparison() {
    assert_eq!(ast("not a == b"), ast("not (a == b)"));
    assert_eq!(ast("not a and b"), ast("(not a) and b"));
    assert_eq!(ast("!a or b"), ast("(!a) or b"));
}

#[test]
fn test_comparison_vs_arithmetic() {
    assert_eq!(ast("a + 1 < b * 2"), ast("(a + 1) < (b * 2)"));
    assert_eq!(ast("a == b != c"), ast("(a == b) != c"));
}

#[test]
fn test_membership() {
    assert_eq!(ast("a in b and c"), ast("(a in b) and c"));
    assert_eq!(ast("a + 1 in b"), ast("(a + 1) in b"));
    assert_eq!(ast("not a in b"), ast("not (a in b)"));
}

#[test]
fn test_unary_vs_binary() {
    assert_eq!(ast("--a"), ast("-(-a)"));
    assert_eq!(ast("-a + b"), ast("(-a) + b"));
    assert_eq!(ast("a + -b"), ast("a + (-b)"));
    assert_eq!(ast("-a * b"), ast("(-a) * b"));
}

#[test]
fn test_exponentiation() {
    assert_eq!(ast("a ^ b ^ c"), ast("a ^ (b ^ c)"));
    assert_eq!(ast("a ^ b ^ c ^ d"), ast("a ^ (b ^ (c ^ d))"));
}

#[test]
fn test_exponentiation_vs_multiplication() {
    assert_eq!(ast("a * b ^ c"), ast("a * (b ^ c)"));
    assert_eq!(ast("a ^ b * c"), ast("(a ^ b) * c"));
}

#[test]
fn test_exponentiation_vs_negation() {
    assert_eq!(ast("-a ^ b"), ast("- (a  ^ b)"));
    assert_eq!(ast("a ^ -b"), ast("a ^ ( -b )"));
}

#[test]
fn test_named_prefix_operators() {
    assert_eq!(ast("sqrt a ^ 2"), ast("sqrt (a ^ 2)"));
    assert_eq!(ast("sqrt a * 2"), ast("(sqrt a) * 2"));
    assert_eq!(ast("abs(a) + 1"), ast("(abs a) + 1"));
}

#[test]
fn test_postfix_binds_tightest() {
    assert_eq!(ast("-a[0]"), ast("-(a[0])"));
    assert_eq!(ast("-a.length"), ast("-(a.length)"));
    assert_eq!(ast("a ^ f(b)[1]"), ast("a ^ ((f(b))[1])"));
}

#[test]
fn test_conditional_vs_binary() {
    assert_eq!(ast("a or b ? c + d : e"), ast("(a or b) ? (c + d) : e"));
    assert_eq!(ast("a ? b : c ? d : e"), ast("a ? b : (c ? d : e)"));
    assert_eq!(ast("a ? b ? c : d : e"), ast("a ? (b ? c : d) : e"));
}

#[test]
fn test_assignment_vs_everything() {
    assert_eq!(ast("x = a ? b : c"), ast("x = (a ? b : c)"));
    assert_eq!(ast("x = y = a + b"), ast("x = (y = (a + b))"));
    assert_eq!(ast("f(x) = x * x"), ast("f(x) = (x * x)"));
}

#[test]
fn test_sequence_is_loosest() {
    assert_eq!(ast("x = 1; x + 2"), ast("(x = 1); (x + 2)"));
    assert_eq!(ast("a; b;"), ast("a; b"));
}
