use super::{Bindings, Value};

#[test]
fn test_display_numbers() {
    assert_eq!(Value::from(3).to_string(), "3");
    assert_eq!(Value::from(2.5).to_string(), "2.5");
    assert_eq!(Value::from(-0.125).to_string(), "-0.125");
    assert_eq!(Value::from(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
    assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
}

#[test]
fn test_display_nested() {
    let value = Value::array([
        Value::from(1),
        Value::from("a\"b"),
        Value::array([Value::Null, Value::from(true)]),
    ]);
    assert_eq!(value.to_string(), r#"[1, "a\"b", [null, true]]"#);
}

#[test]
fn test_to_text_does_not_quote_strings() {
    assert_eq!(Value::from("abc").to_text(), "abc");
    assert_eq!(Value::from(4).to_text(), "4");
    assert_eq!(Value::from(vec!["x"]).to_text(), "[\"x\"]");
}

#[test]
fn test_truthiness() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::from(false).is_truthy());
    assert!(!Value::from(0).is_truthy());
    assert!(!Value::from(f64::NAN).is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(Value::from("0").is_truthy());
    assert!(Value::from(-1).is_truthy());
    assert!(Value::array([]).is_truthy());
}

#[test]
fn test_option_conversion() {
    assert_eq!(Value::from(None::<f64>), Value::Null);
    assert_eq!(Value::from(Some(2)), Value::Number(2.0));
}

#[test]
fn test_bindings_builder() {
    let mut bindings = Bindings::new().with("a", 1).with("b", "two");
    assert_eq!(bindings.get("a"), Some(&Value::Number(1.0)));
    assert_eq!(bindings.get("b").and_then(Value::as_str), Some("two"));
    assert!(!bindings.contains("c"));

    assert_eq!(bindings.insert("a", 5), Some(Value::Number(1.0)));
    assert_eq!(bindings.len(), 2);

    let mut names: Vec<_> = bindings.names().collect();
    names.sort();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn test_bindings_from_array() {
    let bindings = Bindings::from([("x", 1), ("y", 2)]);
    assert_eq!(bindings.get("y"), Some(&Value::Number(2.0)));
}
