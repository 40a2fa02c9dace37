//! Heisenberg-family exchange operators
//!
//! A Heisenberg Hamiltonian is a sum of two-site exchange terms, grouped
//! as `(coupling, edges)` pairs over a graph of lattice sites. Acting on a
//! basis configuration `σ` with coefficient `c`, each edge `(i, j)`
//! contributes:
//!
//! - `+c·J·σ` when spins `i` and `j` are aligned,
//! - `−c·J·σ` plus `+2·c·J·σ⁽ⁱʲ⁾` when they are anti-aligned, where
//!   `σ⁽ⁱʲ⁾` has both spins flipped.
//!
//! The operator never touches the state directly; all contributions go
//! through a running [`StateBuilder`], which absorbs emissions from the
//! diffusion driver without any locking.

use crate::error::{Result, SimError};
use num_complex::Complex64;
use spindrift_core::parse;
use spindrift_core::SpinConfiguration;
use spindrift_state::StateBuilder;
use std::io::BufRead;

/// A pair of site indices participating in one exchange term
pub type Edge = (usize, usize);

/// A sparse operator expressed through its action on basis configurations
pub trait Operator {
    /// Accumulate `c · H|σ⟩` into the builder.
    fn apply(&self, spin: &SpinConfiguration, coeff: Complex64, builder: &StateBuilder<'_>);
}

/// Heisenberg Hamiltonian over a list of `(coupling, edges)` terms
///
/// # Example
///
/// ```
/// use num_complex::Complex64;
/// use spindrift_sim::Heisenberg;
///
/// // Antiferromagnetic chain of three sites.
/// let chain = Heisenberg::with_edges(vec![(0, 1), (1, 2)], Complex64::new(1.0, 0.0));
/// assert_eq!(chain.terms().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Heisenberg {
    terms: Vec<(Complex64, Vec<Edge>)>,
}

impl Heisenberg {
    /// Build an operator from explicit `(coupling, edges)` terms.
    pub fn new(terms: Vec<(Complex64, Vec<Edge>)>) -> Self {
        Self { terms }
    }

    /// Build a single-coupling operator from an adjacency list.
    pub fn with_edges(edges: Vec<Edge>, coupling: Complex64) -> Self {
        Self {
            terms: vec![(coupling, edges)],
        }
    }

    pub fn terms(&self) -> &[(Complex64, Vec<Edge>)] {
        &self.terms
    }

    /// Total number of edges across all terms.
    pub fn num_edges(&self) -> usize {
        self.terms.iter().map(|(_, edges)| edges.len()).sum()
    }
}

impl Operator for Heisenberg {
    fn apply(&self, spin: &SpinConfiguration, coeff: Complex64, builder: &StateBuilder<'_>) {
        for &(coupling, ref edges) in &self.terms {
            for &(i, j) in edges {
                let aligned = spin.get(i) == spin.get(j);
                let sign = if aligned { 1.0 } else { -1.0 };
                builder.push(coeff * coupling * sign, *spin);
                if !aligned {
                    builder.push(coeff * coupling * 2.0, spin.flipped_pair(i, j));
                }
            }
        }
    }
}

/// Read a Hamiltonian specification from `reader`.
///
/// The format is line-oriented text; empty lines and lines whose first
/// non-whitespace character is `#` are skipped. Every data line holds one
/// term:
///
/// ```text
/// <coupling> [ (i, j), (i, j), ... ]
/// ```
///
/// with a real coupling constant and arbitrary whitespace around tokens.
///
/// # Errors
/// - [`SimError::Parse`] for malformed lines
/// - [`SimError::Io`] for stream failures
pub fn read_hamiltonian<R: BufRead>(reader: R) -> Result<Heisenberg> {
    let mut terms = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (coupling, rest) =
            parse::parse_f64(trimmed).map_err(|err| parse_error(number, err.to_string()))?;
        let (edges, rest) =
            parse_adjacency_list(rest).map_err(|err| parse_error(number, err.to_string()))?;
        if !rest.trim_start().is_empty() {
            return Err(parse_error(
                number,
                format!("unexpected trailing input \"{}\"", rest.trim()),
            ));
        }
        terms.push((Complex64::new(coupling, 0.0), edges));
    }
    Ok(Heisenberg::new(terms))
}

fn parse_edge(input: &str) -> spindrift_core::Result<(Edge, &str)> {
    let rest = parse::expect_char('(', parse::skip_spaces(input))?;
    let (i, rest) = parse::parse_usize(rest)?;
    let rest = parse::expect_char(',', parse::skip_spaces(rest))?;
    let (j, rest) = parse::parse_usize(rest)?;
    let rest = parse::expect_char(')', parse::skip_spaces(rest))?;
    Ok(((i, j), rest))
}

fn parse_adjacency_list(input: &str) -> spindrift_core::Result<(Vec<Edge>, &str)> {
    use spindrift_core::CoreError;

    let mut rest = parse::expect_char('[', parse::skip_spaces(input))?;
    let mut edges = Vec::new();
    loop {
        rest = parse::skip_spaces(rest);
        match rest.chars().next() {
            None => return Err(CoreError::UnexpectedEnd { expected: ']' }),
            Some(']') => return Ok((edges, &rest[1..])),
            Some(',') if !edges.is_empty() => {
                let (edge, tail) = parse_edge(&rest[1..])?;
                edges.push(edge);
                rest = tail;
            }
            Some('(') if edges.is_empty() => {
                let (edge, tail) = parse_edge(rest)?;
                edges.push(edge);
                rest = tail;
            }
            Some(got) => {
                let expected = if edges.is_empty() { '(' } else { ',' };
                return Err(CoreError::UnexpectedChar { expected, got });
            }
        }
    }
}

fn parse_error(line: usize, msg: String) -> SimError {
    SimError::Parse { line, msg }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindrift_state::{ShardedState, StateOptions};

    fn spin(s: &str) -> SpinConfiguration {
        s.parse().unwrap()
    }

    /// Apply `op` to a single weighted configuration and collect the result.
    fn apply_once(op: &Heisenberg, spin: SpinConfiguration, coeff: Complex64) -> ShardedState {
        let mut state = ShardedState::new(
            StateOptions::new()
                .with_soft_max(100)
                .with_hard_max(16)
                .with_num_shards(4),
        )
        .unwrap();
        let mut builder = StateBuilder::new(&mut state);
        builder.start();
        op.apply(&spin, coeff, &builder);
        builder.stop().unwrap();
        drop(builder);
        state
    }

    #[test]
    fn anti_aligned_edge_emits_diagonal_and_flip() {
        let op = Heisenberg::with_edges(vec![(0, 1)], Complex64::new(1.0, 0.0));
        let result = apply_once(&op, spin("01"), Complex64::new(1.0, 0.0));

        assert_eq!(result.len(), 2);
        assert_eq!(result.find(&spin("01")), Some(Complex64::new(-1.0, 0.0)));
        assert_eq!(result.find(&spin("10")), Some(Complex64::new(2.0, 0.0)));
    }

    #[test]
    fn aligned_edge_emits_only_the_diagonal() {
        let op = Heisenberg::with_edges(vec![(0, 1)], Complex64::new(1.0, 0.0));
        let result = apply_once(&op, spin("00"), Complex64::new(1.0, 0.0));

        assert_eq!(result.len(), 1);
        assert_eq!(result.find(&spin("00")), Some(Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn coupling_and_coefficient_scale_all_emissions() {
        let op = Heisenberg::with_edges(vec![(0, 1)], Complex64::new(0.5, 0.0));
        let result = apply_once(&op, spin("10"), Complex64::new(0.0, 2.0));

        assert_eq!(result.find(&spin("10")), Some(Complex64::new(0.0, -1.0)));
        assert_eq!(result.find(&spin("01")), Some(Complex64::new(0.0, 2.0)));
    }

    #[test]
    fn multiple_edges_accumulate_on_the_diagonal() {
        let op = Heisenberg::with_edges(vec![(0, 1), (1, 2)], Complex64::new(1.0, 0.0));
        let result = apply_once(&op, spin("010"), Complex64::new(1.0, 0.0));

        // Both edges are anti-aligned: diagonal −1 twice, plus two flips.
        assert_eq!(result.find(&spin("010")), Some(Complex64::new(-2.0, 0.0)));
        assert_eq!(result.find(&spin("100")), Some(Complex64::new(2.0, 0.0)));
        assert_eq!(result.find(&spin("001")), Some(Complex64::new(2.0, 0.0)));
    }

    #[test]
    fn parses_terms_edges_and_comments() {
        let input = "\
# chain with two couplings
1.0 [ (0, 1), (1, 2) ]

-0.5\t[(2,3)]
";
        let op = read_hamiltonian(input.as_bytes()).unwrap();
        assert_eq!(op.terms().len(), 2);
        assert_eq!(op.terms()[0].0, Complex64::new(1.0, 0.0));
        assert_eq!(op.terms()[0].1, vec![(0, 1), (1, 2)]);
        assert_eq!(op.terms()[1].0, Complex64::new(-0.5, 0.0));
        assert_eq!(op.terms()[1].1, vec![(2, 3)]);
        assert_eq!(op.num_edges(), 3);
    }

    #[test]
    fn parses_an_empty_adjacency_list() {
        let op = read_hamiltonian("2.5 [ ]\n".as_bytes()).unwrap();
        assert_eq!(op.terms().len(), 1);
        assert!(op.terms()[0].1.is_empty());
    }

    #[test]
    fn rejects_malformed_lines() {
        for input in [
            "1.0 (0, 1)\n",
            "1.0 [ (0, 1\n",
            "1.0 [ (0 1) ]\n",
            "[ (0, 1) ]\n",
            "1.0 [ (0, 1) ] trailing\n",
        ] {
            assert!(
                matches!(
                    read_hamiltonian(input.as_bytes()),
                    Err(SimError::Parse { line: 1, .. })
                ),
                "input accepted: {:?}",
                input
            );
        }
    }
}
