//! # Event Study
//!
//! A Rust library for event-study analysis on time-indexed metrics.
//!
//! ## Features
//!
//! - Date-indexed metric tables loaded from CSV (via polars)
//! - Three baseline models: zero-order mean, linear and quadratic least squares
//! - AIC-based model selection across candidate lookback windows
//! - Abnormal-return computation with explicit degeneracy markers
//! - Distribution-free significance testing (pluggable permutation test)
//! - SVG chart and JSON summary artifacts per run
//!
//! ## Quick Start
//!
//! ```no_run
//! use event_study::{run_event_study, EventStudyConfig, EventWindow};
//!
//! fn main() -> event_study::Result<()> {
//!     let window = EventWindow::parse("2022-12-04", "2022-12-09")?;
//!     let config = EventStudyConfig::new("bitcoin", "gini", window);
//!     let report = run_event_study(&config)?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! The pieces compose individually as well: load a [`MetricTable`], call
//! [`select_model`] for the best (lookback, variant) combination, feed its
//! predictions to [`abnormal_returns`], and judge the series with any
//! [`SignificanceTest`] implementation.

pub mod abnormal;
pub mod chart;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod selection;
pub mod significance;
pub mod window;

// Re-export commonly used types
pub use crate::abnormal::{abnormal_returns, AbnormalReturns};
pub use crate::data::{DataLoader, MetricSegment, MetricTable};
pub use crate::error::{EventStudyError, Result};
pub use crate::models::{BaselineModel, FitOutcome, ModelKind};
pub use crate::pipeline::{run_event_study, EventStudyConfig, EventStudyReport};
pub use crate::selection::{select_model, Selection, DEFAULT_LOOKBACKS};
pub use crate::significance::{PermutationTest, SignificanceTest};
pub use crate::window::EventWindow;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
