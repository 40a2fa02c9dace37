//! Weighted discrete sampling via the alias method
//!
//! Uses Vose's variant of Walker's alias method: O(n) construction, O(1)
//! sampling. The sampler backs the random-resampling truncation policy,
//! where it turns the `|c|²` weights of the state's entries into a discrete
//! distribution.
//!
//! Reference: Walker, A. J. (1977). "An Efficient Method for Generating
//! Discrete Random Variables with General Distributions"

use crate::error::{Result, StateError};
use rand::Rng;

/// Alias index of entries that keep their full probability
const SENTINEL: usize = usize::MAX;

/// O(1) sampler over a fixed discrete distribution
#[derive(Debug, Clone)]
pub struct AliasTable {
    /// Acceptance threshold for each index
    prob: Vec<f64>,

    /// Donor index drawn when the threshold test fails
    alias: Vec<usize>,
}

impl AliasTable {
    /// Build the table from non-negative weights.
    ///
    /// Weights are scaled so their mean is 1, then indices are split into
    /// donors (≥ 1) and acceptors (< 1) and paired off; residuals keep
    /// probability 1 with no alias.
    ///
    /// # Errors
    /// Returns [`StateError::ZeroWeights`] if the weights sum to zero.
    pub fn new(weights: &[f64]) -> Result<Self> {
        let n = weights.len();
        let sum: f64 = weights.iter().sum();
        if sum == 0.0 {
            return Err(StateError::ZeroWeights);
        }

        let scale = n as f64 / sum;
        let mut scaled: Vec<f64> = weights.iter().map(|&w| w * scale).collect();

        let mut prob = vec![0.0; n];
        let mut alias = vec![SENTINEL; n];

        let mut small = Vec::new();
        let mut large = Vec::new();
        for (i, &w) in scaled.iter().enumerate() {
            if w < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
            small.pop();
            prob[s] = scaled[s];
            alias[s] = l;

            scaled[l] = (scaled[l] + scaled[s]) - 1.0;
            if scaled[l] < 1.0 {
                large.pop();
                small.push(l);
            }
        }

        // Residuals of either list exist only through rounding.
        for &i in large.iter().chain(small.iter()) {
            prob[i] = 1.0;
            alias[i] = SENTINEL;
        }

        Ok(Self { prob, alias })
    }

    /// Number of entries in the distribution.
    #[inline]
    pub fn len(&self) -> usize {
        self.prob.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// Draw one index distributed according to the weights.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let k = rng.gen_range(0..self.prob.len());
        let u: f64 = rng.gen();
        if u < self.prob[k] {
            k
        } else {
            self.alias[k]
        }
    }
}
