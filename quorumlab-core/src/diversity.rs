//! Effective diversity of an ensemble.
//!
//! Correlated members contribute less than independent ones. The scalar
//! form discounts the head count by the mean pairwise correlation; the
//! matrix form derives the same quantity from a full correlation matrix.
//! A shared interaction topology discounts further, since connected
//! members tend to echo each other.

use crate::correlation::CorrelationMatrix;
use crate::graph::InteractionGraph;

/// Topology discount phi in [0.01, 1].
///
/// Dense interaction graphs earn a small discount factor, sparse ones stay
/// near 1. Graphs over at most one member carry no discount. The member
/// count is taken from `members`, not from the graph, so a topology sampled
/// at one size can discount a matrix of another.
pub fn topology_discount(graph: &InteractionGraph, members: usize) -> f64 {
    if members <= 1 {
        return 1.0;
    }
    let possible = (members * (members - 1)) as f64 / 2.0;
    (1.0 - graph.edge_count() as f64 / possible).max(0.01)
}

/// Effective diversity from the mean pairwise correlation.
///
/// D_eff = M · (1 − rho_bar) · phi, floored at 0.01. With no graph the
/// topology discount is 1.
pub fn effective_diversity(
    members: usize,
    mean_correlation: f64,
    graph: Option<&InteractionGraph>,
) -> f64 {
    let phi = match graph {
        Some(g) => topology_discount(g, members),
        None => 1.0,
    };
    (members as f64 * (1.0 - mean_correlation) * phi).max(0.01)
}

/// Effective diversity from a full correlation matrix.
///
/// D_eff = M² / Σᵢⱼ corr(i,j), discounted by topology and floored at 0.01.
/// A matrix whose entries sum to (numerically) zero means fully
/// uncorrelated members; the member count is returned unchanged, with no
/// topology discount applied.
pub fn effective_diversity_from_correlation(
    correlation: &CorrelationMatrix,
    graph: Option<&InteractionGraph>,
) -> f64 {
    let members = correlation.dim();
    let total = correlation.total();
    if total < 1e-12 {
        return members as f64;
    }
    let phi = match graph {
        Some(g) => topology_discount(g, members),
        None => 1.0,
    };
    ((members * members) as f64 / total * phi).max(0.01)
}
