//! Automatic block-length selection for block bootstrap.
//!
//! Serially dependent series need resample blocks long enough to preserve
//! their autocorrelation. The primary estimator follows the Politis–White
//! procedure: find the lag beyond which autocorrelations become
//! insignificant, then balance bias against variance with a flat-top
//! kernel. When the procedure cannot run (constant series, degenerate
//! spectra), selection falls back to a cube-root heuristic, and the
//! selection records which rule produced it.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// A block-length selection strategy.
pub trait BlockLengthEstimator {
    /// Estimated block length for `series`, or `None` when the estimator
    /// cannot produce one.
    fn estimate(&self, series: &[f64]) -> Option<usize>;
}

/// Fixed heuristic: block length ⌊n^(1/3)⌋, at least 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubeRootRule;

impl BlockLengthEstimator for CubeRootRule {
    fn estimate(&self, series: &[f64]) -> Option<usize> {
        Some((((series.len() as f64).powf(1.0 / 3.0)) as usize).max(1))
    }
}

/// Politis–White automatic selection for the circular block bootstrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolitisWhite;

impl BlockLengthEstimator for PolitisWhite {
    fn estimate(&self, series: &[f64]) -> Option<usize> {
        let n = series.len();
        if n < 10 {
            return None;
        }
        let nf = n as f64;
        let mean = series.iter().sum::<f64>() / nf;
        let centered: Vec<f64> = series.iter().map(|x| x - mean).collect();

        let k_n = (nf.log10().floor() as usize).max(5);
        let m_max = nf.sqrt().ceil() as usize + k_n;

        // Biased autocovariances R(0)..R(m_max).
        let mut acv = Vec::with_capacity(m_max + 1);
        for lag in 0..=m_max {
            let mut sum = 0.0;
            for t in 0..n - lag {
                sum += centered[t] * centered[t + lag];
            }
            acv.push(sum / nf);
        }
        if !acv[0].is_finite() || acv[0] <= 0.0 {
            return None;
        }

        let normal = match Normal::new(0.0, 1.0) {
            Ok(d) => d,
            Err(_) => return None,
        };
        let band = normal.inverse_cdf(0.975) * (nf.log10() / nf).sqrt();
        // insignificant[lag - 1] holds for lags 1..=m_max.
        let insignificant: Vec<bool> = acv[1..]
            .iter()
            .map(|r| (r / acv[0]).abs() < band)
            .collect();

        // Smallest lag followed by a full window of insignificant
        // autocorrelations; otherwise the largest significant lag.
        let mut m_hat = None;
        for m in 1..=m_max.saturating_sub(k_n) {
            if insignificant[m..m + k_n].iter().all(|&ok| ok) {
                m_hat = Some(m);
                break;
            }
        }
        let m_hat = match m_hat {
            Some(m) => m,
            None => (1..=m_max)
                .rev()
                .find(|&lag| !insignificant[lag - 1])
                .unwrap_or(1),
        };
        let window = (2 * m_hat).min(m_max);

        // Two-sided flat-top kernel sums; the k = 0 term of g vanishes.
        let mut g = 0.0;
        let mut d_sum = acv[0];
        for lag in 1..=window {
            let w = flat_top(lag as f64 / window as f64);
            g += 2.0 * w * lag as f64 * acv[lag];
            d_sum += 2.0 * w * acv[lag];
        }
        let d_cb = 4.0 / 3.0 * d_sum * d_sum;
        if !d_cb.is_finite() || d_cb <= 0.0 {
            return None;
        }

        let b = ((2.0 * g * g) / d_cb).cbrt() * nf.cbrt();
        if !b.is_finite() {
            return None;
        }
        let b_max = (3.0 * nf.sqrt()).min(nf / 3.0).ceil();
        Some(b.clamp(1.0, b_max).round() as usize)
    }
}

/// Flat-top (trapezoidal) lag window.
fn flat_top(t: f64) -> f64 {
    let a = t.abs();
    if a <= 0.5 {
        1.0
    } else if a <= 1.0 {
        2.0 * (1.0 - a)
    } else {
        0.0
    }
}

/// Which rule produced a block-length selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockLengthRule {
    /// Series under 10 observations: length/3 floor.
    ShortSeries,
    /// Automatic Politis–White selection.
    PolitisWhite,
    /// Cube-root heuristic after a failed automatic selection.
    CubeRootFallback,
}

/// A block length together with its provenance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockLengthSelection {
    pub length: usize,
    pub rule: BlockLengthRule,
}

/// Selects a bootstrap block length for `series`.
///
/// Short series (< 10 observations) use max(1, length/3). Longer series
/// run Politis–White; if that fails, the cube-root heuristic stands in and
/// the returned rule says so. Always returns a positive length.
pub fn optimal_block_length(series: &[f64]) -> BlockLengthSelection {
    let n = series.len();
    if n < 10 {
        return BlockLengthSelection {
            length: (n / 3).max(1),
            rule: BlockLengthRule::ShortSeries,
        };
    }
    match PolitisWhite.estimate(series) {
        Some(length) => BlockLengthSelection {
            length,
            rule: BlockLengthRule::PolitisWhite,
        },
        None => BlockLengthSelection {
            length: CubeRootRule.estimate(series).unwrap_or(1),
            rule: BlockLengthRule::CubeRootFallback,
        },
    }
}
