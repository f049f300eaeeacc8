//! Zero-order baseline: the estimation-window mean as a constant

use crate::data::MetricSegment;
use crate::error::Result;
use crate::models::{aic_score, check_min_observations, sum_squared_error, BaselineModel, FitOutcome};
use statrs::statistics::Statistics;

/// Constant baseline fitted as the arithmetic mean of the estimation values
#[derive(Debug, Clone, Copy)]
pub struct ZeroOrder;

impl BaselineModel for ZeroOrder {
    fn name(&self) -> &'static str {
        "zero"
    }

    fn param_count(&self) -> usize {
        0
    }

    fn fit(&self, estimation: &MetricSegment, target_positions: &[usize]) -> Result<FitOutcome> {
        check_min_observations(self, estimation)?;

        let mean = estimation.values.iter().mean();
        let estimation_predictions = vec![mean; estimation.len()];
        let target_predictions = vec![mean; target_positions.len()];

        let sse = sum_squared_error(&estimation.values, &estimation_predictions);
        let score = aic_score(sse, estimation.len(), self.param_count());

        Ok(FitOutcome {
            target_predictions,
            estimation_predictions,
            score,
        })
    }
}
