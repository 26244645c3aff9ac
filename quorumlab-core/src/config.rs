//! Serializable ensemble configuration.
//!
//! One flat parameter set consumed read-only by every other module:
//! search bounds, loss weights, collusion-risk parameters, and bootstrap
//! defaults. Every field has a documented default, so partial JSON
//! configs deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Tuning parameters for ensemble-size optimization.
///
/// The optimizer never mutates this; the same config can drive any number
/// of scenarios. `fingerprint()` hashes the canonical JSON form so runs
/// with identical parameters can be recognized downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Smallest candidate ensemble size the search considers (default 3).
    pub min_size: usize,

    /// Largest candidate ensemble size the search considers (default 15).
    pub max_size: usize,

    /// Weight on the coordination-cost term of the loss (default 0.05).
    pub cost_weight: f64,

    /// Per-member information cost, the linear part of coordination cost
    /// (default 1.0).
    pub info_cost: f64,

    /// Synthesis-cost coefficient on the superlinear M·ln(M+1) part of
    /// coordination cost (default 0.5).
    pub synthesis_cost: f64,

    /// Peak height of the Gaussian trust bonus (default 0.1).
    pub trust_weight: f64,

    /// Width of the Gaussian trust bonus, in members (default 3.0).
    pub trust_width: f64,

    /// Weight on the collusion-risk penalty term of the loss (default 1.0).
    pub collusion_weight: f64,

    /// Edge-density weight inside the topology risk factor (default 0.7).
    pub edge_weight: f64,

    /// Clustering-coefficient weight inside the topology risk factor
    /// (default 0.3).
    pub clustering_weight: f64,

    /// Discount factor below which repeated play cannot sustain collusion
    /// (default 0.6).
    pub critical_discount: f64,

    /// Interaction-round count at which repetition risk has mostly
    /// saturated (default 5.0).
    pub stabilization_rounds: f64,

    /// Stakes level below which the stakes factor is zero (default 0.2).
    pub min_stakes: f64,

    /// Power-law exponent of stakes sensitivity above the minimum
    /// (default 1.5).
    pub stakes_exponent: f64,

    /// Number of bootstrap resamples for hypothesis tests (default 10 000).
    pub n_bootstrap: usize,

    /// Significance level for bootstrap hypothesis tests (default 0.05).
    pub significance_level: f64,

    /// Seed for the interaction graphs generated inside the size search
    /// (default 42). Each candidate size reuses this seed, so topologies
    /// differ only by size, not by draw.
    pub graph_seed: u64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            min_size: 3,
            max_size: 15,
            cost_weight: 0.05,
            info_cost: 1.0,
            synthesis_cost: 0.5,
            trust_weight: 0.1,
            trust_width: 3.0,
            collusion_weight: 1.0,
            edge_weight: 0.7,
            clustering_weight: 0.3,
            critical_discount: 0.6,
            stabilization_rounds: 5.0,
            min_stakes: 0.2,
            stakes_exponent: 1.5,
            n_bootstrap: 10_000,
            significance_level: 0.05,
            graph_seed: 42,
        }
    }
}

impl EnsembleConfig {
    /// Computes a deterministic content hash for this configuration.
    ///
    /// Serializes to canonical JSON and hashes with BLAKE3. Identical
    /// parameters always produce identical fingerprints.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("EnsembleConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        format!("{}", hash.to_hex())
    }
}
