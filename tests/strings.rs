#[macro_use]
mod cases;

use tally::{Error, LexErrorKind};

test_case!(single_quoted, input: "'hello'", value: "hello");
test_case!(double_quoted, input: r#""hello""#, value: "hello");
test_case!(escaped_quote, input: r"'it\'s'", value: "it's");
test_case!(escaped_tab, input: r#""a\tb""#, value: "a\tb");
test_case!(unicode_escape, input: r"'caf\u00e9'", value: "café");
test_case!(concatenation, input: "'n = ' ++ 3", value: "n = 3");
test_case!(character_index, input: "'héllo'[1]", value: "é");
test_case!(length_member, input: "'héllo'.length", value: 5);
test_case!(lexicographic_order, input: "'abc' < 'abd'", value: true);
test_case!(string_equality, input: "s == 'x'", bindings: [("s", "x")], value: true);
test_case!(index_of_substring, input: "indexOf('lo', 'hello')", value: 3);
test_case!(index_past_end, input: "'ab'[2]", error: Error::Evaluation(_));

#[test]
fn test_unterminated_string() {
    match cases::eval("'abc", &tally::Bindings::new()) {
        Err(Error::Lex(err)) => assert_eq!(err.kind, LexErrorKind::UnterminatedString),
        other => panic!("expected a lex error, got {:?}", other),
    }
}
