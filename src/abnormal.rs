//! Abnormal returns: percentage deviation of observed values from the
//! baseline predictions

use crate::error::{EventStudyError, Result};
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::warn;

/// Percentage deviations over the event window, aligned by position with
/// the observed values and predictions they were computed from.
///
/// Points where the prediction was zero cannot be expressed as a
/// percentage; they carry `f64::NAN` in `values` and their indices are
/// listed in `degenerate` so downstream consumers can exclude them
/// explicitly instead of inheriting silent non-finite numbers.
#[derive(Debug, Clone, Serialize)]
pub struct AbnormalReturns {
    /// Percentage deviation per event-window date
    pub values: Vec<f64>,
    /// Indices of points where the predicted value was zero
    pub degenerate: Vec<usize>,
}

impl AbnormalReturns {
    /// Number of points in the series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The well-defined points, with degenerate markers stripped
    pub fn finite_values(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| v.is_finite()).collect()
    }

    /// Direction of the effect, judged by the mean of the well-defined
    /// points
    pub fn direction(&self) -> &'static str {
        let finite = self.finite_values();
        if finite.is_empty() {
            return "no effect";
        }
        let mean = finite.iter().mean();
        if mean > 0.0 {
            "positive"
        } else if mean < 0.0 {
            "negative"
        } else {
            "no effect"
        }
    }
}

/// Compute per-date percentage abnormal returns:
/// `(observed - predicted) / predicted * 100`.
///
/// Inputs must be aligned by date ascending and of equal length.
pub fn abnormal_returns(observed: &[f64], predicted: &[f64]) -> Result<AbnormalReturns> {
    if observed.len() != predicted.len() {
        return Err(EventStudyError::Validation(format!(
            "Observed length ({}) doesn't match predicted length ({})",
            observed.len(),
            predicted.len()
        )));
    }
    if observed.is_empty() {
        return Err(EventStudyError::Validation(
            "Cannot compute abnormal returns over an empty event window".to_string(),
        ));
    }

    let mut values = Vec::with_capacity(observed.len());
    let mut degenerate = Vec::new();
    for (index, (&obs, &pred)) in observed.iter().zip(predicted).enumerate() {
        if pred == 0.0 {
            warn!(index, "predicted value is zero; marking point as degenerate");
            values.push(f64::NAN);
            degenerate.push(index);
        } else {
            values.push((obs - pred) / pred * 100.0);
        }
    }

    Ok(AbnormalReturns { values, degenerate })
}
