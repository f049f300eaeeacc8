//! Model selection across lookback windows and baseline variants

use crate::data::MetricTable;
use crate::error::{EventStudyError, Result};
use crate::models::{BaselineModel, ModelKind};
use crate::window::EventWindow;
use serde::Serialize;
use tracing::{debug, info};

/// Candidate estimation-window lengths, in days
pub const DEFAULT_LOOKBACKS: [u32; 3] = [30, 60, 90];

/// The winning (lookback, variant) combination and its event-window
/// predictions
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    /// Winning model variant
    pub kind: ModelKind,
    /// Length of the winning estimation window, in days
    pub lookback_days: u32,
    /// AIC-like score of the winning fit
    pub score: f64,
    /// Predictions over the event-window dates
    pub predictions: Vec<f64>,
}

/// Pick the (lookback, variant) combination with the lowest score.
///
/// Lookbacks are tried in the given order and variants in `ModelKind::ALL`
/// order within each lookback; only a strictly lower score replaces the
/// incumbent, so the first combination seen wins ties. This ordering is
/// part of the contract: repeated runs on the same inputs select the same
/// combination.
///
/// Combinations whose estimation window holds fewer observations than the
/// variant requires are skipped; if every combination is skipped the
/// selection fails with `InsufficientData`.
pub fn select_model(
    table: &MetricTable,
    metric: &str,
    event: &EventWindow,
    lookbacks: &[u32],
) -> Result<Selection> {
    if lookbacks.is_empty() {
        return Err(EventStudyError::Validation(
            "No candidate lookback lengths given".to_string(),
        ));
    }

    let event_segment = table.segment(metric, event.start(), event.end())?;
    if event_segment.is_empty() {
        return Err(EventStudyError::Input(format!(
            "No observations of '{}' within the event window {} to {}",
            metric,
            event.start(),
            event.end()
        )));
    }

    let mut best: Option<Selection> = None;
    for &lookback_days in lookbacks {
        let (est_start, est_end) = event.estimation_bounds(lookback_days);
        let estimation = table.segment(metric, est_start, est_end)?;

        for kind in ModelKind::ALL {
            let model = kind.model();
            if estimation.len() < model.min_observations() {
                debug!(
                    model = kind.name(),
                    lookback_days,
                    have = estimation.len(),
                    need = model.min_observations(),
                    "skipping combination with too few estimation observations"
                );
                continue;
            }

            let outcome = model.fit(&estimation, &event_segment.positions)?;
            if best
                .as_ref()
                .map_or(true, |incumbent| outcome.score < incumbent.score)
            {
                best = Some(Selection {
                    kind,
                    lookback_days,
                    score: outcome.score,
                    predictions: outcome.target_predictions,
                });
            }
        }
    }

    match best {
        Some(selection) => {
            info!(
                model = selection.kind.name(),
                lookback_days = selection.lookback_days,
                score = selection.score,
                "selected baseline model"
            );
            Ok(selection)
        }
        None => Err(EventStudyError::InsufficientData(format!(
            "No (lookback, model) combination had enough observations of '{}' before {}",
            metric,
            event.start()
        ))),
    }
}
