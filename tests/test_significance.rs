use event_study::significance::{PermutationTest, SignificanceTest};
use event_study::EventStudyError;

#[test]
fn zero_vector_is_not_significant() {
    let test = PermutationTest::default();
    let verdict = test.is_significant(&[0.0; 10], 0.0, 0.05).unwrap();
    assert!(!verdict);
}

#[test]
fn extreme_constant_offset_is_significant() {
    let test = PermutationTest::default();
    let verdict = test.is_significant(&[1000.0; 10], 0.0, 0.05).unwrap();
    assert!(verdict);
}

#[test]
fn p_value_is_deterministic_for_a_fixed_seed() {
    let series = vec![12.0, -3.0, 8.5, 20.0, 15.0, -1.0];
    let first = PermutationTest::new(2000, 7).unwrap();
    let second = PermutationTest::new(2000, 7).unwrap();

    assert_eq!(
        first.p_value(&series, 0.0).unwrap(),
        second.p_value(&series, 0.0).unwrap()
    );
}

#[test]
fn p_value_stays_within_bounds() {
    let test = PermutationTest::default();
    let p = test.p_value(&[5.0, -2.0, 3.0, 1.0], 0.0).unwrap();
    assert!(p > 0.0 && p <= 1.0);
}

#[test]
fn null_value_shifts_the_hypothesis() {
    // A constant series equals its own null value: nothing to detect
    let test = PermutationTest::default();
    let verdict = test.is_significant(&[42.0; 8], 42.0, 0.05).unwrap();
    assert!(!verdict);
}

#[test]
fn non_finite_input_is_a_degeneracy_error() {
    let test = PermutationTest::default();
    let err = test.p_value(&[1.0, f64::NAN, 3.0], 0.0).unwrap_err();
    assert!(matches!(err, EventStudyError::NumericDegeneracy(_)));
}

#[test]
fn empty_series_is_a_validation_error() {
    let test = PermutationTest::default();
    let err = test.p_value(&[], 0.0).unwrap_err();
    assert!(matches!(err, EventStudyError::Validation(_)));
}

#[test]
fn out_of_range_alpha_is_a_validation_error() {
    let test = PermutationTest::default();
    for alpha in [0.0, 1.0, 1.5, -0.1] {
        let err = test.is_significant(&[1.0, 2.0], 0.0, alpha).unwrap_err();
        assert!(matches!(err, EventStudyError::Validation(_)));
    }
}

#[test]
fn zero_iterations_is_a_validation_error() {
    let err = PermutationTest::new(0, 1).unwrap_err();
    assert!(matches!(err, EventStudyError::Validation(_)));
}
