//! Prefix parsers for line-oriented text formats
//!
//! Each helper consumes a prefix of the input and returns the parsed value
//! together with the remaining input, so callers can chain them when
//! walking a line token by token.

use crate::error::{CoreError, Result};

/// Skip leading whitespace.
#[inline]
pub fn skip_spaces(input: &str) -> &str {
    input.trim_start()
}

/// Consume the expected character `c` or fail.
pub fn expect_char(c: char, input: &str) -> Result<&str> {
    let mut chars = input.chars();
    match chars.next() {
        None => Err(CoreError::UnexpectedEnd { expected: c }),
        Some(got) if got == c => Ok(chars.as_str()),
        Some(got) => Err(CoreError::UnexpectedChar { expected: c, got }),
    }
}

/// Parse a non-negative integer prefix, skipping leading whitespace.
pub fn parse_usize(input: &str) -> Result<(usize, &str)> {
    let rest = skip_spaces(input);
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits == 0 {
        return Err(CoreError::ExpectedInteger(truncated(rest)));
    }
    let value = rest[..digits]
        .parse::<usize>()
        .map_err(|_| CoreError::ExpectedInteger(truncated(rest)))?;
    Ok((value, &rest[digits..]))
}

/// Parse a floating-point prefix, skipping leading whitespace.
///
/// The longest prefix of float-constituent characters is taken and shrunk
/// from the right until it parses, so `"1.0e-2]"` yields `1.0e-2` with
/// `"]"` left over.
pub fn parse_f64(input: &str) -> Result<(f64, &str)> {
    let rest = skip_spaces(input);
    let mut end = rest
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .unwrap_or(rest.len());
    while end > 0 {
        if let Ok(value) = rest[..end].parse::<f64>() {
            return Ok((value, &rest[end..]));
        }
        end -= 1;
    }
    Err(CoreError::ExpectedNumber(truncated(rest)))
}

/// First few characters of `input`, for error messages.
fn truncated(input: &str) -> String {
    input.chars().take(10).collect()
}
