//! Voting rules for combining call sets into a consensus.
//!
//! All rules operate on named call sets and return the combined set.
//! Majority is the default ensemble decision; union and intersection give
//! the sensitivity and precision extremes; weighted voting lets stronger
//! sources count for more.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Errors from voting.
///
/// Implemented by hand rather than via `thiserror` because the
/// `MissingWeight::source` field names a voting source, not an error cause.
#[derive(Debug, PartialEq, Eq)]
pub enum VoteError {
    MissingWeight { source: String },
}

impl std::fmt::Display for VoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteError::MissingWeight { source } => {
                write!(f, "no weight supplied for source {source:?}")
            }
        }
    }
}

impl std::error::Error for VoteError {}

/// Items called by at least `threshold` sources.
///
/// The default threshold is a strict majority, ⌈n/2⌉. A threshold of zero
/// degenerates to the union.
pub fn majority_vote<T: Eq + Hash + Clone>(
    call_sets: &BTreeMap<String, HashSet<T>>,
    threshold: Option<usize>,
) -> HashSet<T> {
    let threshold = threshold.unwrap_or((call_sets.len() + 1) / 2);
    let mut counts: HashMap<&T, usize> = HashMap::new();
    for set in call_sets.values() {
        for item in set {
            *counts.entry(item).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(item, _)| item.clone())
        .collect()
}

/// Items called by any source.
pub fn union_vote<T: Eq + Hash + Clone>(call_sets: &BTreeMap<String, HashSet<T>>) -> HashSet<T> {
    let mut combined = HashSet::new();
    for set in call_sets.values() {
        combined.extend(set.iter().cloned());
    }
    combined
}

/// Items called by every source. Empty input yields the empty set.
pub fn intersection_vote<T: Eq + Hash + Clone>(
    call_sets: &BTreeMap<String, HashSet<T>>,
) -> HashSet<T> {
    let n = call_sets.len();
    if n == 0 {
        return HashSet::new();
    }
    let mut counts: HashMap<&T, usize> = HashMap::new();
    for set in call_sets.values() {
        for item in set {
            *counts.entry(item).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count == n)
        .map(|(item, _)| item.clone())
        .collect()
}

/// Items whose summed source weights reach `threshold`.
///
/// Every source in `call_sets` must have a weight; a missing weight is an
/// error rather than an implicit zero. The default threshold is half the
/// total weight, the weighted analogue of a majority.
pub fn weighted_vote<T: Eq + Hash + Clone>(
    call_sets: &BTreeMap<String, HashSet<T>>,
    weights: &BTreeMap<String, f64>,
    threshold: Option<f64>,
) -> Result<HashSet<T>, VoteError> {
    let mut scores: HashMap<&T, f64> = HashMap::new();
    let mut total_weight = 0.0;
    for (name, set) in call_sets {
        let weight = match weights.get(name) {
            Some(&w) => w,
            None => {
                return Err(VoteError::MissingWeight {
                    source: name.clone(),
                })
            }
        };
        total_weight += weight;
        for item in set {
            *scores.entry(item).or_insert(0.0) += weight;
        }
    }
    let threshold = threshold.unwrap_or(total_weight / 2.0);
    Ok(scores
        .into_iter()
        .filter(|(_, score)| *score >= threshold)
        .map(|(item, _)| item.clone())
        .collect())
}

/// A serializable consensus strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsensusRule {
    /// Strict majority, or an explicit count threshold.
    Majority {
        #[serde(default)]
        threshold: Option<usize>,
    },
    /// Anything any source called.
    Union,
    /// Only what every source called.
    Intersection,
    /// Weighted majority with per-source weights.
    Weighted {
        weights: BTreeMap<String, f64>,
        #[serde(default)]
        threshold: Option<f64>,
    },
}

impl ConsensusRule {
    /// Applies the rule to named call sets.
    pub fn apply<T: Eq + Hash + Clone>(
        &self,
        call_sets: &BTreeMap<String, HashSet<T>>,
    ) -> Result<HashSet<T>, VoteError> {
        match self {
            ConsensusRule::Majority { threshold } => Ok(majority_vote(call_sets, *threshold)),
            ConsensusRule::Union => Ok(union_vote(call_sets)),
            ConsensusRule::Intersection => Ok(intersection_vote(call_sets)),
            ConsensusRule::Weighted { weights, threshold } => {
                weighted_vote(call_sets, weights, *threshold)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_sources() -> BTreeMap<String, HashSet<String>> {
        let mut call_sets = BTreeMap::new();
        call_sets.insert("a".to_string(), to_set(&["X", "Y"]));
        call_sets.insert("b".to_string(), to_set(&["X", "Z"]));
        call_sets.insert("c".to_string(), to_set(&["X"]));
        call_sets
    }

    fn to_set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── Majority ──

    #[test]
    fn majority_needs_two_of_three() {
        let consensus = majority_vote(&three_sources(), None);
        // X appears in 3 sets, Y and Z in 1 each; threshold is ceil(3/2) = 2.
        assert_eq!(consensus, to_set(&["X"]));
    }

    #[test]
    fn explicit_threshold_overrides_default() {
        let consensus = majority_vote(&three_sources(), Some(1));
        assert_eq!(consensus, to_set(&["X", "Y", "Z"]));
        let strict = majority_vote(&three_sources(), Some(3));
        assert_eq!(strict, to_set(&["X"]));
    }

    #[test]
    fn majority_of_nothing_is_empty() {
        let empty: BTreeMap<String, HashSet<String>> = BTreeMap::new();
        assert!(majority_vote(&empty, None).is_empty());
    }

    // ── Union and intersection ──

    #[test]
    fn union_collects_every_call() {
        assert_eq!(union_vote(&three_sources()), to_set(&["X", "Y", "Z"]));
    }

    #[test]
    fn intersection_keeps_unanimous_calls() {
        assert_eq!(intersection_vote(&three_sources()), to_set(&["X"]));
    }

    #[test]
    fn intersection_of_nothing_is_empty() {
        let empty: BTreeMap<String, HashSet<String>> = BTreeMap::new();
        assert!(intersection_vote(&empty).is_empty());
    }

    // ── Weighted ──

    #[test]
    fn weighted_vote_follows_strong_sources() {
        let mut weights = BTreeMap::new();
        weights.insert("a".to_string(), 0.9);
        weights.insert("b".to_string(), 0.2);
        weights.insert("c".to_string(), 0.2);
        // Total weight 1.3, default threshold 0.65: X scores 1.3, Y 0.9,
        // Z 0.2.
        let consensus = weighted_vote(&three_sources(), &weights, None).unwrap();
        assert_eq!(consensus, to_set(&["X", "Y"]));
    }

    #[test]
    fn weighted_vote_requires_every_weight() {
        let mut weights = BTreeMap::new();
        weights.insert("a".to_string(), 1.0);
        weights.insert("b".to_string(), 1.0);
        let err = weighted_vote(&three_sources(), &weights, None).unwrap_err();
        assert_eq!(
            err,
            VoteError::MissingWeight {
                source: "c".to_string()
            }
        );
    }

    #[test]
    fn weighted_vote_with_explicit_threshold() {
        let mut weights = BTreeMap::new();
        weights.insert("a".to_string(), 1.0);
        weights.insert("b".to_string(), 1.0);
        weights.insert("c".to_string(), 1.0);
        let consensus = weighted_vote(&three_sources(), &weights, Some(3.0)).unwrap();
        assert_eq!(consensus, to_set(&["X"]));
    }

    // ── Rule dispatch ──

    #[test]
    fn rule_apply_matches_free_functions() {
        let call_sets = three_sources();
        assert_eq!(
            ConsensusRule::Majority { threshold: None }.apply(&call_sets).unwrap(),
            majority_vote(&call_sets, None)
        );
        assert_eq!(
            ConsensusRule::Union.apply(&call_sets).unwrap(),
            union_vote(&call_sets)
        );
        assert_eq!(
            ConsensusRule::Intersection.apply(&call_sets).unwrap(),
            intersection_vote(&call_sets)
        );
    }

    #[test]
    fn rule_serializes_with_type_tag() {
        let rule = ConsensusRule::Majority { threshold: Some(2) };
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"type\":\"MAJORITY\""));
        let parsed: ConsensusRule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rule);

        let bare: ConsensusRule = serde_json::from_str(r#"{"type":"MAJORITY"}"#).unwrap();
        assert_eq!(bare, ConsensusRule::Majority { threshold: None });

        let weighted: ConsensusRule =
            serde_json::from_str(r#"{"type":"WEIGHTED","weights":{"a":0.5}}"#).unwrap();
        assert_eq!(
            weighted,
            ConsensusRule::Weighted {
                weights: BTreeMap::from([("a".to_string(), 0.5)]),
                threshold: None,
            }
        );
    }
}
