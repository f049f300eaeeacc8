//! Quadratic baseline: second-degree least-squares fit of value vs position

use crate::data::MetricSegment;
use crate::error::Result;
use crate::models::{fit_polynomial, BaselineModel, FitOutcome};

/// Second-degree polynomial baseline fitted by ordinary least squares
#[derive(Debug, Clone, Copy)]
pub struct Quadratic;

impl BaselineModel for Quadratic {
    fn name(&self) -> &'static str {
        "quadratic"
    }

    fn param_count(&self) -> usize {
        2
    }

    fn fit(&self, estimation: &MetricSegment, target_positions: &[usize]) -> Result<FitOutcome> {
        fit_polynomial(self, 2, estimation, target_positions)
    }
}
