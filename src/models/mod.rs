//! Baseline models for counterfactual estimation
//!
//! Three variants share one contract: fit against an estimation-window
//! segment, predict over arbitrary target positions, and report an
//! AIC-like fit score. Lower scores are better. The selector iterates the
//! closed `ModelKind` set in a fixed order, so the variants double as
//! tie-break order.

use crate::data::MetricSegment;
use crate::error::{EventStudyError, Result};
use serde::Serialize;
use std::fmt::Debug;

pub mod linear;
pub mod quadratic;
pub mod zero_order;

pub use linear::Linear;
pub use quadratic::Quadratic;
pub use zero_order::ZeroOrder;

/// Output of fitting one baseline model against one estimation window
#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// Predictions over the requested target positions
    pub target_predictions: Vec<f64>,
    /// Predictions over the estimation window's own positions
    pub estimation_predictions: Vec<f64>,
    /// AIC-like fit score; lower is better
    pub score: f64,
}

/// A baseline model that can fit an estimation window and predict over
/// arbitrary positions
pub trait BaselineModel: Debug {
    /// Short name of the model
    fn name(&self) -> &'static str;

    /// Number of fitted parameters (k in the information criterion)
    fn param_count(&self) -> usize;

    /// Minimum number of estimation observations required for a fit
    fn min_observations(&self) -> usize {
        self.param_count() + 2
    }

    /// Fit against the estimation segment and predict over both the
    /// estimation positions and the given target positions.
    fn fit(&self, estimation: &MetricSegment, target_positions: &[usize]) -> Result<FitOutcome>;
}

/// Tag identifying one of the three baseline model variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    ZeroOrder,
    Linear,
    Quadratic,
}

impl ModelKind {
    /// All variants, in selection tie-break order
    pub const ALL: [ModelKind; 3] = [ModelKind::ZeroOrder, ModelKind::Linear, ModelKind::Quadratic];

    /// The model implementation behind this tag
    pub fn model(self) -> &'static dyn BaselineModel {
        match self {
            ModelKind::ZeroOrder => &ZeroOrder,
            ModelKind::Linear => &Linear,
            ModelKind::Quadratic => &Quadratic,
        }
    }

    /// Short name of the variant
    pub fn name(self) -> &'static str {
        self.model().name()
    }
}

/// SSE floor keeping the score finite on a perfect fit; a floored score
/// still ranks below any genuine residual.
pub(crate) const SSE_FLOOR: f64 = 1e-12;

/// AIC approximation for a least-squares fit: `n*ln(SSE) - n*ln(n) + 2*(k+1)`
/// with Gaussian residuals and MLE variance SSE/n. `k + 1` counts the fitted
/// parameters plus the variance parameter.
pub(crate) fn aic_score(sse: f64, n: usize, k: usize) -> f64 {
    let sse = sse.max(SSE_FLOOR);
    let n = n as f64;
    n * sse.ln() - n * n.ln() + 2.0 * (k as f64 + 1.0)
}

/// Sum of squared residuals between observed and predicted values
pub(crate) fn sum_squared_error(observed: &[f64], predicted: &[f64]) -> f64 {
    observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p).powi(2))
        .sum()
}

pub(crate) fn check_min_observations(
    model: &dyn BaselineModel,
    estimation: &MetricSegment,
) -> Result<()> {
    if estimation.len() < model.min_observations() {
        return Err(EventStudyError::InsufficientData(format!(
            "{} model needs at least {} estimation observations, got {}",
            model.name(),
            model.min_observations(),
            estimation.len()
        )));
    }

    Ok(())
}

/// Shared least-squares fit for the polynomial variants.
///
/// Positions are re-centered on the first estimation position before
/// fitting, which keeps the normal equations well conditioned when row
/// indices are large; predictions are evaluated with the same shift.
pub(crate) fn fit_polynomial(
    model: &dyn BaselineModel,
    degree: usize,
    estimation: &MetricSegment,
    target_positions: &[usize],
) -> Result<FitOutcome> {
    check_min_observations(model, estimation)?;

    let x0 = estimation.positions[0] as f64;
    let xs: Vec<f64> = estimation
        .positions
        .iter()
        .map(|&p| p as f64 - x0)
        .collect();

    let coeffs = polyfit(&xs, &estimation.values, degree)?;

    let estimation_predictions: Vec<f64> = xs.iter().map(|&x| polyval(&coeffs, x)).collect();
    let target_predictions: Vec<f64> = target_positions
        .iter()
        .map(|&p| polyval(&coeffs, p as f64 - x0))
        .collect();

    let sse = sum_squared_error(&estimation.values, &estimation_predictions);
    let score = aic_score(sse, estimation.len(), degree);

    Ok(FitOutcome {
        target_predictions,
        estimation_predictions,
        score,
    })
}

/// Ordinary least-squares polynomial fit via the normal equations.
/// Returns coefficients in ascending-power order.
pub(crate) fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>> {
    let terms = degree + 1;

    // Normal equations A * b = c with A[i][j] = sum(x^(i+j)), c[i] = sum(y * x^i)
    let mut a = vec![vec![0.0; terms]; terms];
    let mut c = vec![0.0; terms];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut power = 1.0;
        let mut powers = Vec::with_capacity(2 * terms - 1);
        for _ in 0..(2 * terms - 1) {
            powers.push(power);
            power *= x;
        }
        for i in 0..terms {
            for j in 0..terms {
                a[i][j] += powers[i + j];
            }
            c[i] += y * powers[i];
        }
    }

    solve_linear_system(a, c)
}

/// Evaluate a polynomial with ascending-power coefficients (Horner's rule)
pub(crate) fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Gaussian elimination with partial pivoting for the small normal-equation
/// systems (at most 3x3 here)
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col].abs() < f64::EPSILON {
            return Err(EventStudyError::NumericDegeneracy(
                "Singular normal equations in least-squares fit".to_string(),
            ));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in (row + 1)..n {
            sum -= a[row][col] * solution[col];
        }
        solution[row] = sum / a[row][row];
    }

    Ok(solution)
}
