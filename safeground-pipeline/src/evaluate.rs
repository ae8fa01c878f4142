//! Aggregate metrics over reasoned examples.

use std::sync::Arc;

use safeground_core::{Candidate, Example, Outcome, SafegroundError};
use safeground_llm::TokenCounter;
use serde::{Deserialize, Serialize};

/// Probabilities this close to 0 or 1 carry no entropy.
pub const TOLERANCE: f64 = 1e-6;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub entropy_correct: f64,
    pub entropy_incorrect: f64,
    /// `None` when no example landed in the bucket.
    pub logprobs_correct: Option<f64>,
    pub logprobs_incorrect: Option<f64>,
}

/// Expected answer for a partition: `"Yes"` for safe, `"No"` for unsafe.
pub fn expected_token(safe: bool) -> &'static str {
    if safe {
        "Yes"
    } else {
        "No"
    }
}

pub fn remove_zeros(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|value| *value != 0.0).collect()
}

pub fn binary_entropy(p: f64) -> f64 {
    if p.abs() < TOLERANCE || (p - 1.0).abs() < TOLERANCE {
        return 0.0;
    }
    -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
}

pub fn hinge(value: f64, sign: f64) -> f64 {
    (value * sign).max(0.0)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub struct Evaluator {
    tokens: Arc<dyn TokenCounter>,
}

impl Evaluator {
    pub fn new(tokens: Arc<dyn TokenCounter>) -> Self {
        Self { tokens }
    }

    pub fn evaluate(
        &self,
        examples: &[Example],
        safe: bool,
    ) -> Result<EvaluationReport, SafegroundError> {
        if examples.is_empty() {
            return Err(SafegroundError::Evaluation(
                "no examples to evaluate".to_string(),
            ));
        }

        let expected = expected_token(safe);
        let distribution_key = format!(" {expected}");

        let mut correct = 0usize;
        let mut entropy_correct = Vec::with_capacity(examples.len());
        let mut entropy_incorrect = Vec::with_capacity(examples.len());
        let mut logprobs_correct = Vec::with_capacity(examples.len());
        let mut logprobs_incorrect = Vec::with_capacity(examples.len());

        for (index, example) in examples.iter().enumerate() {
            let candidate = explanation(index, example)?;

            let answer = candidate.completion.split('.').next().unwrap_or_default();
            let sign = if answer == expected { 1.0 } else { -1.0 };
            if sign > 0.0 {
                correct += 1;
            }

            let p = candidate
                .first_token_distribution
                .get(&distribution_key)
                .map_or(0.0, |log_p| log_p.exp());
            let entropy = binary_entropy(p);
            entropy_correct.push(hinge(entropy, sign));
            entropy_incorrect.push(hinge(entropy, -sign));

            let token_count = self.tokens.count_tokens(&candidate.completion)?;
            if token_count == 0 {
                return Err(SafegroundError::Evaluation(format!(
                    "example {index}: explanation has no tokens"
                )));
            }
            let normalized = (-candidate.log_probability / token_count as f64).exp();
            logprobs_correct.push(hinge(normalized, sign));
            logprobs_incorrect.push(hinge(normalized, -sign));
        }

        Ok(EvaluationReport {
            accuracy: correct as f64 / examples.len() as f64,
            entropy_correct: mean(&entropy_correct).unwrap_or_default(),
            entropy_incorrect: mean(&entropy_incorrect).unwrap_or_default(),
            logprobs_correct: mean(&remove_zeros(&logprobs_correct)),
            logprobs_incorrect: mean(&remove_zeros(&logprobs_incorrect)),
        })
    }
}

fn explanation(index: usize, example: &Example) -> Result<&Candidate, SafegroundError> {
    match example.explanation.as_ref() {
        None => Err(SafegroundError::Evaluation(format!(
            "example {index}: no explanation"
        ))),
        Some(Outcome::Failure(record)) => Err(SafegroundError::Evaluation(format!(
            "example {index}: explanation failed: {}",
            record.error
        ))),
        Some(Outcome::Success(candidates)) => candidates.first().ok_or_else(|| {
            SafegroundError::Evaluation(format!("example {index}: explanation has no candidates"))
        }),
    }
}
