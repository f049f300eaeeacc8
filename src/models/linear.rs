//! Linear baseline: first-degree least-squares fit of value vs position

use crate::data::MetricSegment;
use crate::error::Result;
use crate::models::{fit_polynomial, BaselineModel, FitOutcome};

/// First-degree polynomial baseline fitted by ordinary least squares
#[derive(Debug, Clone, Copy)]
pub struct Linear;

impl BaselineModel for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn param_count(&self) -> usize {
        1
    }

    fn fit(&self, estimation: &MetricSegment, target_positions: &[usize]) -> Result<FitOutcome> {
        fit_polynomial(self, 1, estimation, target_positions)
    }
}
