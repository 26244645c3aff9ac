//! Agreement metrics between call sets.
//!
//! Each ensemble member produces a set of calls; pairwise agreement over
//! those sets doubles as an empirical correlation estimate. The resulting
//! matrix plugs straight into the core diversity machinery.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;
use std::str::FromStr;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quorumlab_core::correlation::{CorrelationError, CorrelationMatrix};

/// Errors from agreement-matrix construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgreementError {
    #[error("unknown agreement method {name:?}, expected \"jaccard\" or \"kappa\"")]
    UnknownMethod { name: String },

    #[error("agreement matrix construction failed: {0}")]
    Correlation(#[from] CorrelationError),
}

/// Pairwise agreement measure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementMethod {
    /// Intersection over union of the two call sets.
    #[default]
    Jaccard,
    /// Cohen's kappa over the pooled universe of all calls.
    Kappa,
}

impl FromStr for AgreementMethod {
    type Err = AgreementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jaccard" => Ok(AgreementMethod::Jaccard),
            "kappa" => Ok(AgreementMethod::Kappa),
            other => Err(AgreementError::UnknownMethod {
                name: other.to_string(),
            }),
        }
    }
}

/// Jaccard similarity |A ∩ B| / |A ∪ B|.
///
/// Returns 0.0 when both sets are empty.
pub fn jaccard_similarity<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Cohen's kappa between two call sets over a pooled universe.
///
/// Every universe item falls into one of four cells (called by both, by
/// one, or by neither); kappa corrects the observed agreement for chance.
/// Returns 0.0 for an empty universe, and 0.0 when expected agreement is
/// already 1 (a universe with no negatives leaves chance nothing to
/// correct).
pub fn cohen_kappa<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>, universe: usize) -> f64 {
    if universe == 0 {
        return 0.0;
    }
    let both = a.intersection(b).count();
    let only_a = a.len() - both;
    let only_b = b.len() - both;
    let neither = universe.saturating_sub(both + only_a + only_b);
    let total = (both + only_a + only_b + neither) as f64;

    let observed = (both + neither) as f64 / total;
    let expected = ((both + only_a) as f64 * (both + only_b) as f64
        + (only_b + neither) as f64 * (only_a + neither) as f64)
        / (total * total);
    if (1.0 - expected).abs() < 1e-12 {
        return 0.0;
    }
    (observed - expected) / (1.0 - expected)
}

/// Builds the pairwise agreement matrix over named call sets.
///
/// Returns the matrix wrapped as a [`CorrelationMatrix`] together with the
/// source names in matrix order (sorted by name). The kappa method pools
/// the universe from every set in the map.
pub fn agreement_matrix<T: Eq + Hash>(
    call_sets: &BTreeMap<String, HashSet<T>>,
    method: AgreementMethod,
) -> Result<(CorrelationMatrix, Vec<String>), AgreementError> {
    let names: Vec<String> = call_sets.keys().cloned().collect();
    let sets: Vec<&HashSet<T>> = call_sets.values().collect();
    let n = sets.len();

    let universe = match method {
        AgreementMethod::Jaccard => 0,
        AgreementMethod::Kappa => {
            let mut pooled: HashSet<&T> = HashSet::new();
            for set in &sets {
                pooled.extend(set.iter());
            }
            pooled.len()
        }
    };

    let mut matrix = DMatrix::zeros(n, n);
    for i in 0..n {
        matrix[(i, i)] = 1.0;
        for j in (i + 1)..n {
            let sim = match method {
                AgreementMethod::Jaccard => jaccard_similarity(sets[i], sets[j]),
                AgreementMethod::Kappa => cohen_kappa(sets[i], sets[j], universe),
            };
            matrix[(i, j)] = sim;
            matrix[(j, i)] = sim;
        }
    }
    let corr = CorrelationMatrix::from_matrix(matrix)?;
    Ok((corr, names))
}
