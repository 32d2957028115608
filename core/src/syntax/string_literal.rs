//! String literal unescaping.
//!
//! Converts the body of a quoted literal (without its quotes) into the runtime
//! string. Supported escapes: `\"`, `\'`, `\\`, `\/`, `\n`, `\r`, `\t`, `\b`,
//! `\f` and `\uNNNN`, where a high/low surrogate pair of `\u` escapes combines
//! into one scalar.

use ecow::EcoString;
use thiserror::Error;

/// Errors that can occur when unescaping string literals.
///
/// Positions are byte offsets relative to the start of the literal body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnescapeError {
    #[error("invalid escape sequence '{seq}' at position {pos}")]
    InvalidEscape { pos: usize, seq: String },

    #[error("invalid hex digit in '{seq}' at position {pos}")]
    InvalidHexDigit { pos: usize, seq: String },

    #[error("incomplete Unicode escape at position {pos}: expected 4 digits, got {got}")]
    IncompleteUnicodeEscape { pos: usize, got: usize },

    #[error("invalid Unicode scalar value U+{value:X} at position {pos}")]
    InvalidUnicodeScalar { pos: usize, value: u32 },
}

impl UnescapeError {
    pub fn pos(&self) -> usize {
        match self {
            UnescapeError::InvalidEscape { pos, .. }
            | UnescapeError::InvalidHexDigit { pos, .. }
            | UnescapeError::IncompleteUnicodeEscape { pos, .. }
            | UnescapeError::InvalidUnicodeScalar { pos, .. } => *pos,
        }
    }
}

type Chars<'a> = core::iter::Peekable<core::str::CharIndices<'a>>;

fn read_hex4(chars: &mut Chars<'_>, escape_pos: usize) -> Result<u32, UnescapeError> {
    let mut value = 0u32;
    for got in 0..4 {
        match chars.next() {
            Some((pos, ch)) => match ch.to_digit(16) {
                Some(digit) => value = (value << 4) | digit,
                None => {
                    return Err(UnescapeError::InvalidHexDigit {
                        pos,
                        seq: format!("\\u{}", ch),
                    });
                }
            },
            None => {
                return Err(UnescapeError::IncompleteUnicodeEscape {
                    pos: escape_pos,
                    got,
                });
            }
        }
    }
    Ok(value)
}

fn read_unicode_escape(chars: &mut Chars<'_>, escape_pos: usize) -> Result<char, UnescapeError> {
    let high = read_hex4(chars, escape_pos)?;
    if (0xD800..0xDC00).contains(&high) {
        // A high surrogate is only valid when immediately followed by `\uDC00..DFFF`.
        let mut lookahead = chars.clone();
        if let (Some((_, '\\')), Some((low_pos, 'u'))) = (lookahead.next(), lookahead.next()) {
            let low = read_hex4(&mut lookahead, low_pos - 1)?;
            if (0xDC00..0xE000).contains(&low) {
                *chars = lookahead;
                let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(combined).ok_or(UnescapeError::InvalidUnicodeScalar {
                    pos: escape_pos,
                    value: combined,
                });
            }
        }
    }
    char::from_u32(high).ok_or(UnescapeError::InvalidUnicodeScalar {
        pos: escape_pos,
        value: high,
    })
}

/// Unescape a string literal body into its runtime value.
///
/// # Example
///
/// ```
/// use tally_core::syntax::string_literal::unescape_string;
///
/// assert_eq!(unescape_string(r"a\tb").unwrap(), "a\tb");
/// assert_eq!(unescape_string(r"caf\u00e9").unwrap(), "café");
/// ```
pub fn unescape_string(input: &str) -> Result<EcoString, UnescapeError> {
    // Fast path: nothing to unescape.
    if !input.contains('\\') {
        return Ok(input.into());
    }

    let mut output = EcoString::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }

        match chars.next() {
            Some((_, 'n')) => output.push('\n'),
            Some((_, 'r')) => output.push('\r'),
            Some((_, 't')) => output.push('\t'),
            Some((_, 'b')) => output.push('\u{0008}'),
            Some((_, 'f')) => output.push('\u{000C}'),
            Some((_, '\\')) => output.push('\\'),
            Some((_, '/')) => output.push('/'),
            Some((_, '"')) => output.push('"'),
            Some((_, '\'')) => output.push('\''),
            Some((_, 'u')) => output.push(read_unicode_escape(&mut chars, pos)?),
            Some((_, other)) => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: format!("\\{}", other),
                });
            }
            None => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: String::from("\\"),
                });
            }
        }
    }

    Ok(output)
}
