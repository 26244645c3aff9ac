//! QuorumLab Consensus — agreement, voting, and evaluation over call sets.
//!
//! Takes the per-member call sets an ensemble produces and turns them
//! into (a) an empirical agreement matrix the core diversity machinery
//! can consume, (b) a combined consensus set under a chosen voting rule,
//! and (c) precision/recall scores against a truth set.
//!
//! File ingestion stays with the callers; everything here operates on
//! in-memory sets.

pub mod agreement;
pub mod evaluation;
pub mod voting;

pub use agreement::{
    agreement_matrix, cohen_kappa, jaccard_similarity, AgreementError, AgreementMethod,
};
pub use evaluation::{evaluate_consensus, ConsensusEvaluation};
pub use voting::{
    intersection_vote, majority_vote, union_vote, weighted_vote, ConsensusRule, VoteError,
};
