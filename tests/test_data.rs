use chrono::NaiveDate;
use event_study::{DataLoader, EventStudyError, MetricTable};
use std::io::Write;
use tempfile::NamedTempFile;

fn date(raw: &str) -> NaiveDate {
    raw.parse().unwrap()
}

#[test]
fn loads_a_metric_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,gini,hhi").unwrap();
    writeln!(file, "2023-01-01,0.40,1200").unwrap();
    writeln!(file, "2023-01-02,0.41,1210").unwrap();
    writeln!(file, "2023-01-03,0.39,1190").unwrap();
    writeln!(file, "2023-01-04,0.42,1250").unwrap();

    let table = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(table.len(), 4);
    assert!(!table.is_empty());
    assert_eq!(table.metric_names(), vec!["gini", "hhi"]);
    assert_eq!(table.metric("gini").unwrap()[0], 0.40);
    assert_eq!(table.metric("hhi").unwrap()[3], 1250.0);
    assert_eq!(table.dates()[0], date("2023-01-01"));
}

#[test]
fn unsorted_rows_are_sorted_by_date() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,gini").unwrap();
    writeln!(file, "2023-01-03,3.0").unwrap();
    writeln!(file, "2023-01-01,1.0").unwrap();
    writeln!(file, "2023-01-02,2.0").unwrap();

    let table = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(
        table.dates(),
        &[date("2023-01-01"), date("2023-01-02"), date("2023-01-03")]
    );
    assert_eq!(table.metric("gini").unwrap(), &[1.0, 2.0, 3.0]);
}

#[test]
fn duplicate_dates_are_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,gini").unwrap();
    writeln!(file, "2023-01-01,1.0").unwrap();
    writeln!(file, "2023-01-01,2.0").unwrap();

    let err = DataLoader::from_csv(file.path()).unwrap_err();
    assert!(matches!(err, EventStudyError::Input(_)));
}

#[test]
fn missing_file_is_an_input_error() {
    let err = DataLoader::from_csv("nonexistent_file.csv").unwrap_err();
    assert!(matches!(err, EventStudyError::Input(_)));
}

#[test]
fn first_column_is_the_date_fallback() {
    // Ledger exports often carry the date as an index column with an
    // arbitrary name
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "day,entropy").unwrap();
    writeln!(file, "2023-02-01,5.5").unwrap();
    writeln!(file, "2023-02-02,5.6").unwrap();

    let table = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(table.metric_names(), vec!["entropy"]);
    assert_eq!(table.dates()[1], date("2023-02-02"));
}

#[test]
fn non_numeric_columns_are_ignored() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,gini,note").unwrap();
    writeln!(file, "2023-01-01,0.4,start").unwrap();
    writeln!(file, "2023-01-02,0.5,end").unwrap();

    let table = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(table.metric_names(), vec!["gini"]);
}

#[test]
fn unknown_metric_lookup_is_an_input_error() {
    let table = MetricTable::new(
        vec![date("2023-01-01")],
        vec![("gini".to_string(), vec![0.4])],
    )
    .unwrap();

    let err = table.metric("tau").unwrap_err();
    assert!(matches!(err, EventStudyError::Input(_)));
    assert!(err.to_string().contains("tau"));
}

#[test]
fn segment_bounds_are_inclusive_and_positions_are_table_rows() {
    let dates: Vec<NaiveDate> = (1..=10)
        .map(|d| NaiveDate::from_ymd_opt(2023, 3, d).unwrap())
        .collect();
    let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let table = MetricTable::new(dates, vec![("mpr".to_string(), values)]).unwrap();

    let segment = table
        .segment("mpr", date("2023-03-04"), date("2023-03-07"))
        .unwrap();

    assert_eq!(segment.positions, vec![3, 4, 5, 6]);
    assert_eq!(segment.values, vec![4.0, 5.0, 6.0, 7.0]);
    assert_eq!(segment.dates[0], date("2023-03-04"));
    assert_eq!(segment.len(), 4);
}

#[test]
fn mismatched_column_lengths_are_rejected() {
    let err = MetricTable::new(
        vec![date("2023-01-01"), date("2023-01-02")],
        vec![("gini".to_string(), vec![0.4])],
    )
    .unwrap_err();
    assert!(matches!(err, EventStudyError::Validation(_)));
}
