//! Collusion-risk model.
//!
//! Risk is the product of three factors: interaction topology (channels to
//! coordinate over), repeated play (future to retaliate in), and stakes
//! (something worth capturing). Each factor is zero below its own
//! precondition, so the product vanishes whenever any one condition for
//! collusion is absent.

use crate::config::EnsembleConfig;
use crate::graph::InteractionGraph;

/// Topology factor in [0, 1].
///
/// Weighted mix of edge density and average clustering, clipped to [0, 1].
/// Zero for ensembles of at most one member. The member count is taken
/// from `members`, matching [`crate::diversity::topology_discount`].
pub fn topology_risk(graph: &InteractionGraph, members: usize, config: &EnsembleConfig) -> f64 {
    if members <= 1 {
        return 0.0;
    }
    let possible = (members * (members - 1)) as f64 / 2.0;
    let density = graph.edge_count() as f64 / possible;
    let mixed = config.edge_weight * density + config.clustering_weight * graph.average_clustering();
    mixed.clamp(0.0, 1.0)
}

/// Repeated-interaction factor.
///
/// Zero below the critical discount factor; above it, a quadratic ramp in
/// the excess discount, saturating in the round count at the configured
/// stabilization scale.
pub fn repetition_risk(rounds: u32, discount_factor: f64, config: &EnsembleConfig) -> f64 {
    if discount_factor < config.critical_discount {
        return 0.0;
    }
    let ramp = (discount_factor - config.critical_discount) / (1.0 - config.critical_discount);
    ramp * ramp * (1.0 - (-(rounds as f64) / config.stabilization_rounds).exp())
}

/// Stakes factor.
///
/// Zero below the minimum stakes threshold; above it, a power law in the
/// excess stakes.
pub fn stakes_risk(stakes: f64, config: &EnsembleConfig) -> f64 {
    if stakes < config.min_stakes {
        return 0.0;
    }
    (stakes - config.min_stakes).powf(config.stakes_exponent)
}

/// Combined collusion risk: the product of the three factors.
///
/// For stakes in [0, 1] the product stays within [0, 1].
pub fn collusion_risk(
    members: usize,
    graph: &InteractionGraph,
    rounds: u32,
    discount_factor: f64,
    stakes: f64,
    config: &EnsembleConfig,
) -> f64 {
    topology_risk(graph, members, config)
        * repetition_risk(rounds, discount_factor, config)
        * stakes_risk(stakes, config)
}

/// Percolation threshold for an ensemble of `members`: the interaction
/// probability above which a random graph tends to form a giant connected
/// component, 1/(M−1). Ensembles of at most two members threshold at 1.
pub fn percolation_threshold(members: usize) -> f64 {
    1.0 / (members.saturating_sub(1).max(1) as f64)
}
