//! QuorumLab Core — ensemble-size optimization engine.
//!
//! Decides how many members a decision ensemble should have by balancing
//! what more members buy (error averaging, trust) against what they cost
//! (coordination, collusion exposure):
//!
//! - Block-structured correlation matrices with a PSD guarantee
//! - Interaction graphs with seeded Erdős–Rényi sampling
//! - Effective-diversity estimation, scalar and matrix forms
//! - Multiplicative collusion-risk scoring with zero preconditions
//! - Combined loss over candidate sizes and an integer search
//! - Circular block bootstrap with automatic block-length selection
//!
//! Every operation is a bounded, synchronous computation over in-memory
//! data; randomness is always explicitly seeded.

pub mod block_length;
pub mod bootstrap;
pub mod collusion;
pub mod config;
pub mod correlation;
pub mod diversity;
pub mod graph;
pub mod optimizer;

pub use block_length::{
    optimal_block_length, BlockLengthEstimator, BlockLengthRule, BlockLengthSelection,
    CubeRootRule, PolitisWhite,
};
pub use bootstrap::{
    bootstrap_one_sided_test, circular_block_bootstrap, BootstrapError, Statistic, TestOutcome,
};
pub use collusion::{
    collusion_risk, percolation_threshold, repetition_risk, stakes_risk, topology_risk,
};
pub use config::EnsembleConfig;
pub use correlation::{CorrelationError, CorrelationMatrix};
pub use diversity::{effective_diversity, effective_diversity_from_correlation, topology_discount};
pub use graph::{GraphError, InteractionGraph};
pub use optimizer::{
    loss_components, optimize_ensemble_size, target_size, LossComponents, OptimizationResult,
    OptimizeError, Scenario,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn require_send<T: Send>() {}
    fn require_sync<T: Sync>() {}

    #[test]
    fn public_types_are_send_and_sync() {
        require_send::<EnsembleConfig>();
        require_sync::<EnsembleConfig>();
        require_send::<Scenario>();
        require_sync::<Scenario>();
        require_send::<CorrelationMatrix>();
        require_sync::<CorrelationMatrix>();
        require_send::<InteractionGraph>();
        require_sync::<InteractionGraph>();
        require_send::<OptimizationResult>();
        require_sync::<OptimizationResult>();
        require_send::<TestOutcome>();
        require_sync::<TestOutcome>();
        require_send::<BlockLengthSelection>();
        require_sync::<BlockLengthSelection>();
    }
}
