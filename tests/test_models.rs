use chrono::{Duration, NaiveDate};
use event_study::models::{BaselineModel, ModelKind};
use event_study::{EventStudyError, MetricSegment};
use rstest::rstest;

/// Helper to build a segment with consecutive positions starting at `start`
fn segment(start: usize, values: Vec<f64>) -> MetricSegment {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let positions: Vec<usize> = (start..start + values.len()).collect();
    let dates: Vec<NaiveDate> = positions
        .iter()
        .map(|&p| base + Duration::days(p as i64))
        .collect();

    MetricSegment {
        positions,
        dates,
        values,
    }
}

#[test]
fn zero_order_predicts_the_mean_everywhere() {
    let estimation = segment(0, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let outcome = ModelKind::ZeroOrder
        .model()
        .fit(&estimation, &[10, 11, 12])
        .unwrap();

    let mean = 3.5;
    assert!(outcome.estimation_predictions.iter().all(|&p| p == mean));
    assert!(outcome.target_predictions.iter().all(|&p| p == mean));
    assert_eq!(outcome.estimation_predictions.len(), 6);
    assert_eq!(outcome.target_predictions.len(), 3);
    assert!(outcome.score.is_finite());
}

#[test]
fn linear_recovers_a_perfect_line_including_extrapolation() {
    let values: Vec<f64> = (0..10).map(|i| 2.0 * i as f64 + 5.0).collect();
    let estimation = segment(0, values);
    let outcome = ModelKind::Linear.model().fit(&estimation, &[20, 25]).unwrap();

    for (i, &pred) in outcome.estimation_predictions.iter().enumerate() {
        let expected = 2.0 * i as f64 + 5.0;
        assert!((pred - expected).abs() < 1e-8, "estimation at {}: {}", i, pred);
    }
    assert!((outcome.target_predictions[0] - 45.0).abs() < 1e-6);
    assert!((outcome.target_predictions[1] - 55.0).abs() < 1e-6);
    assert!(outcome.score.is_finite());
}

#[test]
fn quadratic_recovers_a_perfect_parabola_including_extrapolation() {
    let values: Vec<f64> = (0..13)
        .map(|i| {
            let x = i as f64;
            0.5 * x * x - 3.0 * x + 2.0
        })
        .collect();
    let estimation = segment(0, values);
    let outcome = ModelKind::Quadratic.model().fit(&estimation, &[20]).unwrap();

    for (i, &pred) in outcome.estimation_predictions.iter().enumerate() {
        let x = i as f64;
        let expected = 0.5 * x * x - 3.0 * x + 2.0;
        assert!((pred - expected).abs() < 1e-6, "estimation at {}: {}", i, pred);
    }
    // 0.5 * 400 - 60 + 2
    assert!((outcome.target_predictions[0] - 142.0).abs() < 1e-6);
}

#[test]
fn quadratic_scores_best_on_curved_truth() {
    let values: Vec<f64> = (0..20)
        .map(|i| {
            let x = i as f64;
            0.3 * x * x + 1.0 * x + 10.0
        })
        .collect();
    let estimation = segment(0, values);

    let zero = ModelKind::ZeroOrder.model().fit(&estimation, &[25]).unwrap();
    let linear = ModelKind::Linear.model().fit(&estimation, &[25]).unwrap();
    let quadratic = ModelKind::Quadratic.model().fit(&estimation, &[25]).unwrap();

    assert!(quadratic.score < linear.score);
    assert!(quadratic.score < zero.score);
    assert!(linear.score < zero.score);
}

#[test]
fn fits_are_independent_of_position_offset() {
    // Same line expressed at positions 100.. should extrapolate identically
    let values: Vec<f64> = (0..10).map(|i| 3.0 * i as f64 - 1.0).collect();
    let estimation = segment(100, values);
    let outcome = ModelKind::Linear.model().fit(&estimation, &[115]).unwrap();

    // Position 115 is 15 steps past the segment start
    assert!((outcome.target_predictions[0] - (3.0 * 15.0 - 1.0)).abs() < 1e-6);
}

#[rstest]
#[case(ModelKind::ZeroOrder, 2)]
#[case(ModelKind::Linear, 3)]
#[case(ModelKind::Quadratic, 4)]
fn minimum_observation_counts_are_enforced(#[case] kind: ModelKind, #[case] minimum: usize) {
    let model = kind.model();
    assert_eq!(model.min_observations(), minimum);

    let too_short = segment(0, (0..minimum - 1).map(|i| i as f64).collect());
    let err = model.fit(&too_short, &[50]).unwrap_err();
    assert!(matches!(err, EventStudyError::InsufficientData(_)));

    let just_enough = segment(0, (0..minimum).map(|i| i as f64).collect());
    assert!(model.fit(&just_enough, &[50]).is_ok());
}

#[test]
fn perfect_fit_keeps_the_score_finite() {
    // SSE is exactly zero for a constant series under the zero-order model
    let estimation = segment(0, vec![4.0; 8]);
    let outcome = ModelKind::ZeroOrder.model().fit(&estimation, &[9]).unwrap();

    assert!(outcome.score.is_finite());
    assert!(outcome.score < 0.0);
}

#[test]
fn variant_iteration_order_is_fixed() {
    let names: Vec<&str> = ModelKind::ALL.iter().map(|kind| kind.name()).collect();
    assert_eq!(names, vec!["zero", "linear", "quadratic"]);
}
