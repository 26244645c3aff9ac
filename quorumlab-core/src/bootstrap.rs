//! Circular block bootstrap and a one-sided test.
//!
//! Ordinary independent resampling understates variance on autocorrelated
//! series. The circular block bootstrap resamples whole blocks with
//! wraparound instead, preserving short-range dependence. The one-sided
//! test recenters the series at a null value, bootstraps the mean, and
//! reports where an observed statistic falls in that null distribution.
//!
//! All randomness comes from a caller-supplied seeded generator, so every
//! resample sequence is reproducible.

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block_length::{optimal_block_length, BlockLengthRule};

/// Errors from bootstrap configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("unknown statistic {name:?}, expected \"mean\" or \"variance\"")]
    UnknownStatistic { name: String },
}

/// The statistic computed on each resampled series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Statistic {
    Mean,
    /// Population variance (no degrees-of-freedom correction).
    Variance,
}

impl Statistic {
    /// Evaluates the statistic; an empty series evaluates to 0.0.
    pub fn apply(&self, series: &[f64]) -> f64 {
        if series.is_empty() {
            return 0.0;
        }
        let n = series.len() as f64;
        let mean = series.iter().sum::<f64>() / n;
        match self {
            Statistic::Mean => mean,
            Statistic::Variance => series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n,
        }
    }
}

impl FromStr for Statistic {
    type Err = BootstrapError;

    /// Parses the selector strings `"mean"` and `"variance"`; anything
    /// else fails fast rather than defaulting.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Statistic::Mean),
            "variance" => Ok(Statistic::Variance),
            other => Err(BootstrapError::UnknownStatistic {
                name: other.to_string(),
            }),
        }
    }
}

/// Resamples `series` with the circular block bootstrap.
///
/// Each of the `n_bootstrap` iterations draws ⌈T/bl⌉ uniform start
/// indices, concatenates length-`bl` windows with wraparound, truncates to
/// the original length, and evaluates `statistic`. The block length is
/// clamped to [1, T]. An empty series yields all-zero statistics.
pub fn circular_block_bootstrap(
    series: &[f64],
    block_length: usize,
    n_bootstrap: usize,
    statistic: Statistic,
    rng: &mut StdRng,
) -> Vec<f64> {
    let t = series.len();
    if t == 0 {
        return vec![0.0; n_bootstrap];
    }
    let bl = block_length.clamp(1, t);
    let n_blocks = t.div_ceil(bl);
    let mut stats = Vec::with_capacity(n_bootstrap);
    let mut resample = Vec::with_capacity(n_blocks * bl);
    for _ in 0..n_bootstrap {
        resample.clear();
        for _ in 0..n_blocks {
            let start = rng.gen_range(0..t);
            for offset in 0..bl {
                resample.push(series[(start + offset) % t]);
            }
        }
        resample.truncate(t);
        stats.push(statistic.apply(&resample));
    }
    stats
}

/// Outcome of a one-sided bootstrap test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TestOutcome {
    /// Whether the observed statistic significantly exceeds the null value.
    pub reject_null: bool,

    /// Fraction of null-distribution statistics at or above the observed.
    pub p_value: f64,

    /// Block length the resampling used.
    pub block_length: usize,

    /// Which selection rule produced the block length.
    pub block_rule: BlockLengthRule,
}

/// Tests whether `observed` significantly exceeds `null_value`.
///
/// Selects a block length for `series`, recenters the series so its mean
/// equals the null value, bootstraps the mean of the recentered series,
/// and computes p as the fraction of bootstrap means at or above
/// `observed`. Rejects when p < `alpha`.
pub fn bootstrap_one_sided_test(
    observed: f64,
    series: &[f64],
    null_value: f64,
    n_bootstrap: usize,
    alpha: f64,
    rng: &mut StdRng,
) -> TestOutcome {
    let selection = optimal_block_length(series);
    let mean = Statistic::Mean.apply(series);
    let centered: Vec<f64> = series.iter().map(|x| x - mean + null_value).collect();
    let boot = circular_block_bootstrap(
        &centered,
        selection.length,
        n_bootstrap,
        Statistic::Mean,
        rng,
    );
    let p_value = if boot.is_empty() {
        0.0
    } else {
        boot.iter().filter(|&&stat| stat >= observed).count() as f64 / boot.len() as f64
    };
    TestOutcome {
        reject_null: p_value < alpha,
        p_value,
        block_length: selection.length,
        block_rule: selection.rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen::<f64>() - 0.5).collect()
    }

    // ── Statistics ──

    #[test]
    fn mean_of_known_series() {
        assert!((Statistic::Mean.apply(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn variance_is_population_variance() {
        let v = Statistic::Variance.apply(&[1.0, 2.0, 3.0]);
        assert!((v - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn statistic_of_empty_series_is_zero() {
        assert_eq!(Statistic::Mean.apply(&[]), 0.0);
        assert_eq!(Statistic::Variance.apply(&[]), 0.0);
    }

    #[test]
    fn statistic_parses_known_selectors() {
        assert_eq!("mean".parse::<Statistic>().unwrap(), Statistic::Mean);
        assert_eq!("variance".parse::<Statistic>().unwrap(), Statistic::Variance);
    }

    #[test]
    fn unknown_selector_fails_fast() {
        let err = "median".parse::<Statistic>().unwrap_err();
        assert_eq!(
            err,
            BootstrapError::UnknownStatistic {
                name: "median".to_string()
            }
        );
        assert!(err.to_string().contains("unknown statistic"));
    }

    #[test]
    fn statistic_serializes_screaming_snake() {
        assert_eq!(serde_json::to_string(&Statistic::Mean).unwrap(), "\"MEAN\"");
        let parsed: Statistic = serde_json::from_str("\"VARIANCE\"").unwrap();
        assert_eq!(parsed, Statistic::Variance);
    }

    // ── Circular block bootstrap ──

    #[test]
    fn constant_series_resamples_to_constant() {
        let mut rng = StdRng::seed_from_u64(42);
        let stats = circular_block_bootstrap(&[7.0; 20], 4, 50, Statistic::Mean, &mut rng);
        assert_eq!(stats.len(), 50);
        for stat in stats {
            assert!((stat - 7.0).abs() < 1e-12);
        }
    }

    #[test]
    fn bootstrap_deterministic_per_seed() {
        let series = noise(40, 5);
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let stats_a = circular_block_bootstrap(&series, 5, 20, Statistic::Mean, &mut a);
        let stats_b = circular_block_bootstrap(&series, 5, 20, Statistic::Mean, &mut b);
        assert_eq!(stats_a, stats_b);
    }

    #[test]
    fn bootstrap_seeds_differ() {
        let series = noise(40, 5);
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        let stats_a = circular_block_bootstrap(&series, 5, 20, Statistic::Mean, &mut a);
        let stats_b = circular_block_bootstrap(&series, 5, 20, Statistic::Mean, &mut b);
        assert_ne!(stats_a, stats_b);
    }

    #[test]
    fn resampled_means_stay_within_series_range() {
        let series = noise(30, 9);
        let lo = series.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut rng = StdRng::seed_from_u64(3);
        for stat in circular_block_bootstrap(&series, 7, 100, Statistic::Mean, &mut rng) {
            assert!(stat >= lo - 1e-12 && stat <= hi + 1e-12);
        }
    }

    #[test]
    fn oversized_block_length_is_clamped() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut rng = StdRng::seed_from_u64(8);
        let stats = circular_block_bootstrap(&series, 99, 10, Statistic::Mean, &mut rng);
        assert_eq!(stats.len(), 10);
        for stat in stats {
            assert!((1.0..=5.0).contains(&stat));
        }
    }

    #[test]
    fn zero_block_length_is_treated_as_one() {
        let mut rng = StdRng::seed_from_u64(8);
        let stats = circular_block_bootstrap(&[1.0, 2.0], 0, 5, Statistic::Mean, &mut rng);
        assert_eq!(stats.len(), 5);
    }

    #[test]
    fn empty_series_yields_zero_statistics() {
        let mut rng = StdRng::seed_from_u64(8);
        let stats = circular_block_bootstrap(&[], 3, 4, Statistic::Variance, &mut rng);
        assert_eq!(stats, vec![0.0; 4]);
    }

    #[test]
    fn variance_resamples_are_nonnegative() {
        let series = noise(25, 13);
        let mut rng = StdRng::seed_from_u64(4);
        for stat in circular_block_bootstrap(&series, 4, 50, Statistic::Variance, &mut rng) {
            assert!(stat >= 0.0);
        }
    }

    // ── One-sided test ──

    #[test]
    fn far_observed_statistic_rejects() {
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = bootstrap_one_sided_test(5.0, &[0.0; 30], 0.0, 200, 0.05, &mut rng);
        assert_eq!(outcome.p_value, 0.0);
        assert!(outcome.reject_null);
    }

    #[test]
    fn observed_below_null_distribution_accepts() {
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = bootstrap_one_sided_test(-1.0, &[0.0; 30], 0.0, 200, 0.05, &mut rng);
        assert_eq!(outcome.p_value, 1.0);
        assert!(!outcome.reject_null);
    }

    #[test]
    fn observed_at_null_value_accepts() {
        // Every bootstrap mean of the constant null series equals 0.0 and
        // counts as "at or above" the observed 0.0.
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = bootstrap_one_sided_test(0.0, &[0.0; 30], 0.0, 200, 0.05, &mut rng);
        assert_eq!(outcome.p_value, 1.0);
        assert!(!outcome.reject_null);
    }

    #[test]
    fn p_value_near_half_when_observed_is_typical() {
        let series = noise(60, 21);
        let observed = Statistic::Mean.apply(&series);
        let mut rng = StdRng::seed_from_u64(17);
        let outcome = bootstrap_one_sided_test(observed, &series, observed, 400, 0.05, &mut rng);
        assert!(
            outcome.p_value > 0.35 && outcome.p_value < 0.65,
            "got {}",
            outcome.p_value
        );
    }

    #[test]
    fn outcome_records_block_provenance() {
        let mut rng = StdRng::seed_from_u64(42);
        let short = bootstrap_one_sided_test(1.0, &[0.0; 6], 0.0, 10, 0.05, &mut rng);
        assert_eq!(short.block_length, 2);
        assert_eq!(short.block_rule, BlockLengthRule::ShortSeries);

        let constant = bootstrap_one_sided_test(1.0, &[3.0; 50], 3.0, 10, 0.05, &mut rng);
        assert_eq!(constant.block_length, 3);
        assert_eq!(constant.block_rule, BlockLengthRule::CubeRootFallback);
    }

    #[test]
    fn zero_resamples_reject_by_convention() {
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = bootstrap_one_sided_test(1.0, &noise(20, 2), 0.0, 0, 0.05, &mut rng);
        assert_eq!(outcome.p_value, 0.0);
        assert!(outcome.reject_null);
    }

    #[test]
    fn outcome_serializes_for_reporting() {
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = bootstrap_one_sided_test(0.5, &noise(40, 6), 0.0, 100, 0.05, &mut rng);
        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: TestOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome);
    }
}
