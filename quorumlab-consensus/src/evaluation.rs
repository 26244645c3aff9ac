//! Evaluation of a consensus call set against a truth set.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Precision/recall breakdown of a call set against truth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConsensusEvaluation {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,

    /// Fraction of calls that are true; 0.0 when nothing was called.
    pub precision: f64,

    /// Fraction of truth that was called; 0.0 when truth is empty.
    pub recall: f64,

    /// Harmonic mean of precision and recall; 0.0 when both are zero.
    pub f1: f64,
}

/// Scores `calls` against `truth`.
pub fn evaluate_consensus<T: Eq + Hash>(
    calls: &HashSet<T>,
    truth: &HashSet<T>,
) -> ConsensusEvaluation {
    let true_positives = calls.intersection(truth).count();
    let false_positives = calls.len() - true_positives;
    let false_negatives = truth.len() - true_positives;

    let precision = if calls.is_empty() {
        0.0
    } else {
        true_positives as f64 / calls.len() as f64
    };
    let recall = if truth.is_empty() {
        0.0
    } else {
        true_positives as f64 / truth.len() as f64
    };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    ConsensusEvaluation {
        true_positives,
        false_positives,
        false_negatives,
        precision,
        recall,
        f1,
    }
}
