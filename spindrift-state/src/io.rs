//! Line-oriented text format for states
//!
//! A state file is UTF-8 text. Lines whose first non-whitespace character
//! is `#`, and empty lines, are comments. Every data line holds one entry:
//!
//! ```text
//! <configuration> <real> <imag>
//! ```
//!
//! where `<configuration>` is a string of `'0'`/`'1'` of at most 112 spins
//! and the fields are separated by tabs or spaces. Output is written in the
//! state's iteration order. Duplicate configurations in the input are a
//! parse error.

use crate::error::{Result, StateError};
use crate::sharded_state::ShardedState;
use num_complex::Complex64;
use spindrift_core::SpinConfiguration;
use std::io::{BufRead, Write};

/// Read a state from `reader`, replacing the current contents of `state`.
///
/// # Errors
/// - [`StateError::Parse`] for malformed lines, configurations longer than
///   112 spins, or duplicate configurations
/// - [`StateError::Io`] for stream failures
pub fn read_state<R: BufRead>(reader: R, state: &mut ShardedState) -> Result<()> {
    state.clear();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (spin, rest) = SpinConfiguration::parse_prefix(trimmed)
            .map_err(|err| parse_error(number, err.to_string()))?;
        let mut fields = rest.split_whitespace();
        let real = parse_field(number, fields.next())?;
        let imag = parse_field(number, fields.next())?;

        if !state.insert(spin, Complex64::new(real, imag)) {
            return Err(parse_error(
                number,
                format!("duplicate configuration \"{}\"", spin),
            ));
        }
    }
    Ok(())
}

/// Write every entry of `state` in iteration order.
pub fn write_state<W: Write>(writer: &mut W, state: &ShardedState) -> Result<()> {
    for (spin, coeff) in state.iter() {
        writeln!(writer, "{}\t{}\t{}", spin, coeff.re, coeff.im)?;
    }
    Ok(())
}

/// Write `comments` as `#` lines followed by the state itself.
///
/// Readers skip the comment lines, so annotated output round-trips.
pub fn write_state_with_comments<W, I, S>(
    writer: &mut W,
    state: &ShardedState,
    comments: I,
) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for comment in comments {
        writeln!(writer, "# {}", comment.as_ref())?;
    }
    write_state(writer, state)
}

fn parse_field(line: usize, field: Option<&str>) -> Result<f64> {
    let field = field.ok_or_else(|| parse_error(line, "missing coefficient field".into()))?;
    field
        .parse::<f64>()
        .map_err(|_| parse_error(line, format!("expected a number, but got \"{}\"", field)))
}

fn parse_error(line: usize, msg: String) -> StateError {
    StateError::Parse { line, msg }
}
