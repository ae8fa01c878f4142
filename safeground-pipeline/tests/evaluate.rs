mod common;

use std::sync::Arc;

use common::*;
use safeground_core::{ErrorRecord, Example, Outcome, SafegroundError};
use safeground_pipeline::{binary_entropy, remove_zeros, Evaluator, TOLERANCE};

fn reasoned(completion: &str, log_probability: f64, dist: &[(&str, f64)]) -> Example {
    let mut example = beach();
    example.explanation = Some(Outcome::Success(vec![candidate(
        completion,
        log_probability,
        dist,
    )]));
    example
}

fn evaluator() -> Evaluator {
    Evaluator::new(Arc::new(WordCounter))
}

#[test]
fn confident_correct_answer_only_feeds_the_correct_logprob_bucket() {
    let examples = [reasoned("Yes.", -0.3, &[(" Yes", 0.0)])];

    let report = evaluator().evaluate(&examples, true).unwrap();

    assert_eq!(report.accuracy, 1.0);
    assert!(binary_entropy(1.0).abs() < TOLERANCE);
    assert_eq!(report.entropy_correct, 0.0);
    assert_eq!(report.entropy_incorrect, 0.0);
    let expected = (0.3f64 / 1.0).exp();
    assert!((report.logprobs_correct.unwrap() - expected).abs() < 1e-12);
    assert_eq!(report.logprobs_incorrect, None);
}

#[test]
fn remove_zeros_drops_only_exact_zeros() {
    assert_eq!(remove_zeros(&[0.0, 0.0, 1.2, -0.5]), vec![1.2, -0.5]);
}

#[test]
fn entropy_means_keep_zeros_but_logprob_means_do_not() {
    // p = 0.5 for both, so each contributes entropy 1.0 to one bucket.
    let half = 0.5f64.ln();
    let examples = [
        reasoned("No", -1.0, &[(" No", half)]),
        reasoned("Yes", -2.0, &[(" No", half)]),
    ];

    let report = evaluator().evaluate(&examples, false).unwrap();

    assert_eq!(report.accuracy, 0.5);
    assert!((report.entropy_correct - 0.5).abs() < 1e-12);
    assert!((report.entropy_incorrect - 0.5).abs() < 1e-12);
    assert!((report.logprobs_correct.unwrap() - 1.0f64.exp()).abs() < 1e-9);
    assert!((report.logprobs_incorrect.unwrap() - 2.0f64.exp()).abs() < 1e-9);
}

#[test]
fn expected_token_match_is_exact_up_to_the_first_period() {
    let examples = [
        reasoned("No. Lightning strikes water", -1.0, &[]),
        reasoned("no.", -1.0, &[]),
        reasoned(" No.", -1.0, &[]),
    ];

    let report = evaluator().evaluate(&examples, false).unwrap();
    assert!((report.accuracy - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn absent_expected_token_has_zero_probability() {
    let examples = [reasoned("Yes", -0.5, &[(" No", -0.1)])];

    let report = evaluator().evaluate(&examples, true).unwrap();
    assert_eq!(report.entropy_correct, 0.0);
}

#[test]
fn failed_explanations_are_evaluation_errors() {
    let mut failed = beach();
    failed.explanation = Some(Outcome::Failure(ErrorRecord::new("rate limited")));

    let err = evaluator().evaluate(&[failed], true).unwrap_err();
    assert!(matches!(err, SafegroundError::Evaluation(ref m) if m.contains("rate limited")));

    let err = evaluator().evaluate(&[beach()], true).unwrap_err();
    assert!(matches!(err, SafegroundError::Evaluation(_)));

    let err = evaluator().evaluate(&[], true).unwrap_err();
    assert!(matches!(err, SafegroundError::Evaluation(_)));
}

#[test]
fn zero_token_completions_are_evaluation_errors() {
    let err = evaluator()
        .evaluate(&[reasoned("", -0.5, &[])], true)
        .unwrap_err();
    assert!(matches!(err, SafegroundError::Evaluation(_)));
}
