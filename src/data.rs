//! Metric table loading and date-range slicing

use crate::error::{EventStudyError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Date-indexed table of named numeric metrics.
///
/// Rows are strictly date-ascending with no duplicate dates; the loader
/// sorts on ingest and rejects duplicates. Once built the table is
/// read-only input for the analysis.
#[derive(Debug, Clone)]
pub struct MetricTable {
    /// Row dates, strictly ascending
    dates: Vec<NaiveDate>,
    /// One value column per metric, aligned with `dates`
    metrics: Vec<(String, Vec<f64>)>,
}

/// A date-range slice of one metric.
///
/// `positions` are the row indices in the full table, so positions of an
/// event-window segment continue past those of an estimation-window
/// segment taken from the same table. Models fit against positions and can
/// therefore extrapolate beyond the window they were fitted on.
#[derive(Debug, Clone)]
pub struct MetricSegment {
    /// Row indices in the originating table
    pub positions: Vec<usize>,
    /// Row dates
    pub dates: Vec<NaiveDate>,
    /// Metric values
    pub values: Vec<f64>,
}

impl MetricSegment {
    /// Number of observations in the segment
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the segment is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Data loader for metric tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a metric table from a CSV file with a date column and one
    /// numeric column per metric.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<MetricTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            EventStudyError::Input(format!("Cannot open '{}': {}", path.display(), e))
        })?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Build a metric table from an existing DataFrame.
    pub fn from_dataframe(df: DataFrame) -> Result<MetricTable> {
        let date_column = Self::detect_date_column(&df)?;
        let dates = parse_date_column(df.column(&date_column)?)?;

        let mut metrics = Vec::new();
        for name in df.get_column_names() {
            if name == date_column {
                continue;
            }
            let col = df.column(name)?;
            if !col.dtype().is_numeric() {
                continue;
            }
            metrics.push((name.to_string(), column_as_f64(col)?));
        }

        if metrics.is_empty() {
            return Err(EventStudyError::Input(
                "No numeric metric columns found in data".to_string(),
            ));
        }

        MetricTable::new(dates, metrics)
    }

    /// Detect the date column: a column whose name mentions date/time, or
    /// failing that the first column (ledger exports often carry the date
    /// as an unnamed index column).
    fn detect_date_column(df: &DataFrame) -> Result<String> {
        let column_names = df.get_column_names();

        for name in &column_names {
            let lower_name = name.to_lowercase();
            if lower_name.contains("date")
                || lower_name.contains("time")
                || lower_name.contains("timestamp")
            {
                return Ok(name.to_string());
            }
        }

        column_names
            .first()
            .map(|name| name.to_string())
            .ok_or_else(|| EventStudyError::Input("No columns found in data".to_string()))
    }
}

impl MetricTable {
    /// Create a metric table from parallel date and metric vectors.
    ///
    /// Rows are sorted by date; duplicate dates are rejected.
    pub fn new(dates: Vec<NaiveDate>, metrics: Vec<(String, Vec<f64>)>) -> Result<Self> {
        for (name, values) in &metrics {
            if values.len() != dates.len() {
                return Err(EventStudyError::Validation(format!(
                    "Metric column '{}' has {} values but there are {} dates",
                    name,
                    values.len(),
                    dates.len()
                )));
            }
        }

        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);

        let dates: Vec<NaiveDate> = order.iter().map(|&i| dates[i]).collect();
        let metrics: Vec<(String, Vec<f64>)> = metrics
            .into_iter()
            .map(|(name, values)| {
                let sorted = order.iter().map(|&i| values[i]).collect();
                (name, sorted)
            })
            .collect();

        if let Some(pair) = dates.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(EventStudyError::Input(format!(
                "Duplicate date {} in data",
                pair[0]
            )));
        }

        Ok(Self { dates, metrics })
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Row dates, ascending
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Names of the metric columns
    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Values of one metric column
    pub fn metric(&self, name: &str) -> Result<&[f64]> {
        self.metrics
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| {
                EventStudyError::Input(format!(
                    "Metric column '{}' not found; available columns: {:?}",
                    name,
                    self.metric_names()
                ))
            })
    }

    /// Slice one metric to the closed date interval `[start, end]`.
    pub fn segment(&self, metric: &str, start: NaiveDate, end: NaiveDate) -> Result<MetricSegment> {
        let values = self.metric(metric)?;

        let mut segment = MetricSegment {
            positions: Vec::new(),
            dates: Vec::new(),
            values: Vec::new(),
        };
        for (position, (&date, &value)) in self.dates.iter().zip(values).enumerate() {
            if date >= start && date <= end {
                segment.positions.push(position);
                segment.dates.push(date);
                segment.values.push(value);
            }
        }

        Ok(segment)
    }
}

/// Parse a date column of Utf8 `YYYY-MM-DD` strings, Date or Datetime values.
fn parse_date_column(col: &Series) -> Result<Vec<NaiveDate>> {
    match col.dtype() {
        DataType::Utf8 => col
            .utf8()
            .unwrap()
            .into_iter()
            .map(|opt| {
                let raw = opt.ok_or_else(|| {
                    EventStudyError::Input("Null value in date column".to_string())
                })?;
                parse_date_str(raw)
            })
            .collect(),
        DataType::Date => col
            .date()
            .unwrap()
            .into_iter()
            .map(|opt| {
                let days = opt.ok_or_else(|| {
                    EventStudyError::Input("Null value in date column".to_string())
                })?;
                Ok(epoch_date() + chrono::Duration::days(i64::from(days)))
            })
            .collect(),
        DataType::Datetime(unit, _) => {
            let divisor = match unit {
                TimeUnit::Nanoseconds => 1_000_000_000,
                TimeUnit::Microseconds => 1_000_000,
                TimeUnit::Milliseconds => 1_000,
            };
            col.datetime()
                .unwrap()
                .into_iter()
                .map(|opt| {
                    let ts = opt.ok_or_else(|| {
                        EventStudyError::Input("Null value in date column".to_string())
                    })?;
                    NaiveDateTime::from_timestamp_opt(ts / divisor, 0)
                        .map(|dt| dt.date())
                        .ok_or_else(|| {
                            EventStudyError::Input(format!(
                                "Timestamp {} in date column is out of range",
                                ts
                            ))
                        })
                })
                .collect()
        }
        other => Err(EventStudyError::Input(format!(
            "Date column has unsupported type {:?}",
            other
        ))),
    }
}

/// Parse a single raw date string, accepting a trailing time-of-day part.
fn parse_date_str(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    Err(EventStudyError::Input(format!(
        "Cannot parse '{}' as a date",
        raw
    )))
}

/// Convert a numeric column to f64 values; nulls are an input error.
fn column_as_f64(col: &Series) -> Result<Vec<f64>> {
    let casted = col.cast(&DataType::Float64)?;
    casted
        .f64()
        .unwrap()
        .into_iter()
        .map(|opt| {
            opt.ok_or_else(|| {
                EventStudyError::Input(format!("Null value in metric column '{}'", col.name()))
            })
        })
        .collect()
}

fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}
