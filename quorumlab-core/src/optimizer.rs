//! Ensemble-size search.
//!
//! Scores every candidate size M in the configured bounds with a combined
//! loss and returns the minimizer:
//!
//!   L(M) = L_error + L_cost − L_trust + L_coll
//!
//! Error loss falls with effective diversity, coordination cost grows
//! superlinearly, a Gaussian trust bonus peaks at a scenario-derived
//! target size, and collusion risk penalizes dense well-worn topologies.
//! Each candidate gets an interaction graph sampled from the same seed, so
//! candidates differ by size alone.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collusion::collusion_risk;
use crate::config::EnsembleConfig;
use crate::diversity::effective_diversity;
use crate::graph::InteractionGraph;

/// Errors from the size search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizeError {
    #[error("empty search range: min_size {min_size} exceeds max_size {max_size}")]
    EmptyRange { min_size: usize, max_size: usize },
}

/// The deployment being sized.
///
/// All magnitudes are normalized to [0, 1] except the round count and the
/// error variance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scenario {
    /// Reliability signal strength: how much the task rewards adding
    /// independent members (default 0.5).
    pub reliability: f64,

    /// Stakes of the decision being made (default 0.5).
    pub stakes: f64,

    /// Mean pairwise correlation among members (default 0.3).
    pub mean_correlation: f64,

    /// Probability that any two members share an interaction channel
    /// (default 0.0).
    pub interaction_prob: f64,

    /// Number of repeated interaction rounds (default 10).
    pub rounds: u32,

    /// Discount factor members apply to future payoffs (default 0.7).
    pub discount_factor: f64,

    /// Variance of a single member's error (default 1.0).
    pub error_variance: f64,

    /// Whether to force an odd ensemble size for clean majorities
    /// (default true).
    pub enforce_odd: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            reliability: 0.5,
            stakes: 0.5,
            mean_correlation: 0.3,
            interaction_prob: 0.0,
            rounds: 10,
            discount_factor: 0.7,
            error_variance: 1.0,
            enforce_odd: true,
        }
    }
}

/// The four loss terms evaluated at one candidate size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LossComponents {
    /// Residual error after diversity averaging.
    pub error: f64,

    /// Coordination cost of running the ensemble.
    pub cost: f64,

    /// Gaussian trust bonus (subtracted from the total).
    pub trust: f64,

    /// Weighted collusion-risk penalty.
    pub collusion: f64,
}

impl LossComponents {
    /// Combined loss: error + cost − trust + collusion.
    pub fn total(&self) -> f64 {
        self.error + self.cost - self.trust + self.collusion
    }
}

/// Outcome of the size search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationResult {
    /// The chosen ensemble size.
    pub selected_size: usize,

    /// Combined loss at the chosen size.
    pub loss: f64,

    /// Loss terms at the chosen size.
    pub components: LossComponents,
}

/// Scenario-preferred ensemble size, the center of the trust bonus.
///
/// Grows with the reliability signal (faster when members are correlated,
/// since each new member adds less) and with stakes. Both increments are
/// floored, matching integer head counts.
pub fn target_size(scenario: &Scenario, config: &EnsembleConfig) -> f64 {
    let spread = (4.0 * scenario.reliability / (1.0 - scenario.mean_correlation + 0.01)).floor();
    let stakes_pull = (4.0 * scenario.stakes * (1.0 + scenario.reliability)).floor();
    config.min_size as f64 + spread + stakes_pull
}

/// Evaluates the loss terms for one candidate size on a given topology.
pub fn loss_components(
    members: usize,
    scenario: &Scenario,
    target: f64,
    graph: &InteractionGraph,
    config: &EnsembleConfig,
) -> LossComponents {
    let m = members as f64;
    let diversity = effective_diversity(members, scenario.mean_correlation, Some(graph));
    let error = scenario.error_variance / diversity;
    let cost = config.cost_weight * (m * config.info_cost + config.synthesis_cost * m * (m + 1.0).ln());
    let gap = m - target;
    let trust =
        config.trust_weight * (-(gap * gap) / (2.0 * config.trust_width * config.trust_width)).exp();
    let collusion = config.collusion_weight
        * collusion_risk(
            members,
            graph,
            scenario.rounds,
            scenario.discount_factor,
            scenario.stakes,
            config,
        );
    LossComponents {
        error,
        cost,
        trust,
        collusion,
    }
}

/// Searches [min_size, max_size] for the loss-minimizing ensemble size.
///
/// Ties break toward the smaller size. With `enforce_odd` set, an even
/// winner is bumped to the next odd size when that still fits the bounds;
/// the reported loss and components are re-evaluated at the size actually
/// returned. When the bounds pin the search to a single even size, that
/// even size is returned as-is.
pub fn optimize_ensemble_size(
    scenario: &Scenario,
    config: &EnsembleConfig,
) -> Result<OptimizationResult, OptimizeError> {
    if config.min_size > config.max_size {
        return Err(OptimizeError::EmptyRange {
            min_size: config.min_size,
            max_size: config.max_size,
        });
    }
    let target = target_size(scenario, config);
    let edge_prob = scenario.interaction_prob.min(0.99);

    let mut best_size = config.min_size;
    let mut best_components = candidate(best_size, scenario, target, edge_prob, config);
    let mut best_loss = best_components.total();
    for members in (config.min_size + 1)..=config.max_size {
        let components = candidate(members, scenario, target, edge_prob, config);
        let loss = components.total();
        if loss < best_loss {
            best_loss = loss;
            best_size = members;
            best_components = components;
        }
    }

    let mut selected = best_size;
    if scenario.enforce_odd && selected % 2 == 0 {
        selected = (selected + 1).min(config.max_size);
    }
    if selected != best_size {
        best_components = candidate(selected, scenario, target, edge_prob, config);
        best_loss = best_components.total();
    }

    Ok(OptimizationResult {
        selected_size: selected,
        loss: best_loss,
        components: best_components,
    })
}

fn candidate(
    members: usize,
    scenario: &Scenario,
    target: f64,
    edge_prob: f64,
    config: &EnsembleConfig,
) -> LossComponents {
    let graph = InteractionGraph::erdos_renyi(members, edge_prob, config.graph_seed);
    loss_components(members, scenario, target, &graph, config)
}
