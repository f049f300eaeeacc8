//! Statistical significance of abnormal returns

use crate::error::{EventStudyError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::statistics::Statistics;
use std::fmt::Debug;

/// Default number of permutation iterations
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Default RNG seed; fixed so repeated runs agree
pub const DEFAULT_SEED: u64 = 42;

/// Decides whether an abnormal-return series is statistically
/// distinguishable from a null value.
///
/// The concrete test is a replaceable strategy: the statistically correct
/// procedure for a single observed unit (one ledger, one event) is still
/// under discussion, so callers can swap in another implementation without
/// touching the pipeline.
pub trait SignificanceTest: Debug {
    /// True if the series differs significantly from `null_value` at level
    /// `alpha`
    fn is_significant(&self, abreturns: &[f64], null_value: f64, alpha: f64) -> Result<bool>;
}

/// Single-sample sign-flip permutation test.
///
/// Deviations from the null value are randomly sign-flipped; the p-value is
/// the share of permuted absolute means at least as large as the observed
/// absolute mean, with the usual +1 correction. Distribution-free and
/// deterministic for a fixed seed.
///
/// This default is a placeholder pending domain-expert confirmation that a
/// sign-flip test is the right choice for single-unit abnormal returns;
/// see `SignificanceTest` for swapping it out.
#[derive(Debug, Clone)]
pub struct PermutationTest {
    iterations: usize,
    seed: u64,
}

impl PermutationTest {
    /// Create a test with an explicit iteration count and RNG seed
    pub fn new(iterations: usize, seed: u64) -> Result<Self> {
        if iterations == 0 {
            return Err(EventStudyError::Validation(
                "Permutation test needs at least one iteration".to_string(),
            ));
        }

        Ok(Self { iterations, seed })
    }

    /// Permutation p-value of the series against `null_value`
    pub fn p_value(&self, abreturns: &[f64], null_value: f64) -> Result<f64> {
        if abreturns.is_empty() {
            return Err(EventStudyError::Validation(
                "Cannot test significance of an empty series".to_string(),
            ));
        }
        if abreturns.iter().any(|v| !v.is_finite()) {
            return Err(EventStudyError::NumericDegeneracy(
                "Abnormal-return series contains non-finite points; strip degenerate markers \
                 before testing"
                    .to_string(),
            ));
        }

        let deviations: Vec<f64> = abreturns.iter().map(|&v| v - null_value).collect();
        let n = deviations.len() as f64;
        let observed = deviations.iter().mean().abs();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut at_least_as_extreme = 0usize;
        for _ in 0..self.iterations {
            let flipped_sum: f64 = deviations
                .iter()
                .map(|&d| if rng.gen::<bool>() { d } else { -d })
                .sum();
            if (flipped_sum / n).abs() >= observed {
                at_least_as_extreme += 1;
            }
        }

        Ok((at_least_as_extreme + 1) as f64 / (self.iterations + 1) as f64)
    }
}

impl Default for PermutationTest {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SignificanceTest for PermutationTest {
    fn is_significant(&self, abreturns: &[f64], null_value: f64, alpha: f64) -> Result<bool> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(EventStudyError::Validation(format!(
                "Significance threshold must lie in (0, 1), got {}",
                alpha
            )));
        }

        Ok(self.p_value(abreturns, null_value)? < alpha)
    }
}
