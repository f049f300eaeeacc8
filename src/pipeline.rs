//! Run-to-completion event-study pipeline

use crate::abnormal::{abnormal_returns, AbnormalReturns};
use crate::chart::render_line_chart;
use crate::data::DataLoader;
use crate::error::{EventStudyError, Result};
use crate::models::ModelKind;
use crate::selection::{select_model, DEFAULT_LOOKBACKS};
use crate::significance::{PermutationTest, SignificanceTest, DEFAULT_ITERATIONS, DEFAULT_SEED};
use crate::window::EventWindow;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Configuration for one event-study run.
///
/// Runs are independent: nothing is shared between invocations, so
/// different (dataset, metric, event window) triples can be analyzed in
/// any order or in parallel.
#[derive(Debug, Clone, Serialize)]
pub struct EventStudyConfig {
    /// Dataset identifier; the input file is `{input_dir}/{dataset}.csv`
    pub dataset: String,
    /// Metric column to analyze
    pub metric: String,
    /// Event window under study
    pub event_window: EventWindow,
    /// Directory holding the input CSV
    pub input_dir: PathBuf,
    /// Directory receiving the chart and summary artifacts
    pub output_dir: PathBuf,
    /// Candidate estimation-window lengths, in days
    pub lookbacks: Vec<u32>,
    /// Significance threshold
    pub alpha: f64,
    /// Permutation-test iteration count
    pub permutation_iterations: usize,
    /// Permutation-test RNG seed
    pub permutation_seed: u64,
}

impl EventStudyConfig {
    /// Configuration with the default directories, lookbacks, threshold and
    /// permutation settings
    pub fn new(
        dataset: impl Into<String>,
        metric: impl Into<String>,
        event_window: EventWindow,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            metric: metric.into(),
            event_window,
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            lookbacks: DEFAULT_LOOKBACKS.to_vec(),
            alpha: 0.05,
            permutation_iterations: DEFAULT_ITERATIONS,
            permutation_seed: DEFAULT_SEED,
        }
    }

    /// Path of the input CSV for this run
    pub fn input_path(&self) -> PathBuf {
        self.input_dir.join(format!("{}.csv", self.dataset))
    }

    fn artifact_stem(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.dataset,
            self.metric,
            self.event_window.start(),
            self.event_window.end()
        )
    }
}

/// Result of one event-study run
#[derive(Debug, Clone, Serialize)]
pub struct EventStudyReport {
    pub dataset: String,
    pub metric: String,
    pub event_window: EventWindow,
    /// Winning model variant
    pub model: ModelKind,
    /// Winning estimation-window length, in days
    pub lookback_days: u32,
    /// Score of the winning fit
    pub score: f64,
    /// Event-window dates, ascending
    pub dates: Vec<NaiveDate>,
    /// Observed metric values over the event window
    pub observed: Vec<f64>,
    /// Baseline predictions over the event window
    pub predicted: Vec<f64>,
    /// Percentage abnormal returns
    pub abnormal_returns: AbnormalReturns,
    /// Verdict of the significance test
    pub significant: bool,
    /// Where the chart was written
    pub chart_path: PathBuf,
}

impl EventStudyReport {
    /// One-line human-readable verdict
    pub fn summary(&self) -> String {
        if self.significant {
            format!(
                "{}: {} model, {} day window reveals a significant {} event",
                self.metric,
                self.model.name(),
                self.lookback_days,
                self.abnormal_returns.direction()
            )
        } else {
            format!(
                "{}: {} model, {} day window reveals no significant event",
                self.metric,
                self.model.name(),
                self.lookback_days
            )
        }
    }
}

/// Run the full pipeline: load, select a baseline, compute abnormal
/// returns, test significance, then write the chart and JSON summary.
///
/// All computation happens before any file is written, so a failed run
/// leaves no partial artifacts. Degenerate abnormal-return points (zero
/// predictions) are excluded from the significance statistic and reported
/// in the result.
pub fn run_event_study(config: &EventStudyConfig) -> Result<EventStudyReport> {
    let table = DataLoader::from_csv(config.input_path())?;

    let event = &config.event_window;
    let event_segment = table.segment(&config.metric, event.start(), event.end())?;
    if event_segment.is_empty() {
        return Err(EventStudyError::Input(format!(
            "No observations of '{}' within the event window {} to {}",
            config.metric,
            event.start(),
            event.end()
        )));
    }

    let selection = select_model(&table, &config.metric, event, &config.lookbacks)?;
    let abnormal = abnormal_returns(&event_segment.values, &selection.predictions)?;

    let finite = abnormal.finite_values();
    if finite.is_empty() {
        return Err(EventStudyError::NumericDegeneracy(format!(
            "Every baseline prediction for '{}' over the event window was zero",
            config.metric
        )));
    }
    let tester = PermutationTest::new(config.permutation_iterations, config.permutation_seed)?;
    let significant = tester.is_significant(&finite, 0.0, config.alpha)?;

    let stem = config.artifact_stem();
    let chart_path = config.output_dir.join(format!("{}.svg", stem));
    let report = EventStudyReport {
        dataset: config.dataset.clone(),
        metric: config.metric.clone(),
        event_window: *event,
        model: selection.kind,
        lookback_days: selection.lookback_days,
        score: selection.score,
        dates: event_segment.dates.clone(),
        observed: event_segment.values.clone(),
        predicted: selection.predictions.clone(),
        abnormal_returns: abnormal,
        significant,
        chart_path: chart_path.clone(),
    };

    fs::create_dir_all(&config.output_dir)?;
    render_line_chart(
        &chart_path,
        &config.metric,
        &report.dates,
        &report.abnormal_returns.values,
    )?;
    let summary_path = config.output_dir.join(format!("{}.json", stem));
    fs::write(&summary_path, serde_json::to_string_pretty(&report)?)?;

    info!(
        dataset = config.dataset.as_str(),
        metric = config.metric.as_str(),
        summary = report.summary().as_str(),
        "event study complete"
    );

    Ok(report)
}
