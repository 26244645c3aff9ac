//! Interaction graphs over ensemble members.
//!
//! An undirected simple graph records which members share an information
//! channel. Graphs come from an explicit edge list or from a seeded
//! Erdős–Rényi draw; the optimizer regenerates the candidate graph from
//! one configured seed so topologies stay comparable across sizes.

use petgraph::graph::{NodeIndex, UnGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors from explicit edge-list construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("edge references member {index} but the graph has {members} members")]
    MemberOutOfRange { index: usize, members: usize },

    #[error("self-loop on member {index} is not allowed")]
    SelfLoop { index: usize },
}

/// Undirected simple graph over a fixed set of ensemble members.
///
/// No self-loops and no parallel edges; the member count is fixed at
/// construction time.
#[derive(Debug, Clone)]
pub struct InteractionGraph {
    graph: UnGraph<(), ()>,
}

impl InteractionGraph {
    /// A graph with `members` nodes and no edges.
    pub fn empty(members: usize) -> Self {
        let mut graph = UnGraph::with_capacity(members, 0);
        for _ in 0..members {
            graph.add_node(());
        }
        Self { graph }
    }

    /// Builds a graph from an explicit edge list.
    ///
    /// Duplicate pairs collapse to a single edge. Self-loops and
    /// out-of-range member indices are rejected.
    pub fn from_edges(members: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut built = Self::empty(members);
        for &(a, b) in edges {
            if a == b {
                return Err(GraphError::SelfLoop { index: a });
            }
            for index in [a, b] {
                if index >= members {
                    return Err(GraphError::MemberOutOfRange { index, members });
                }
            }
            let (na, nb) = (NodeIndex::new(a), NodeIndex::new(b));
            if !built.graph.contains_edge(na, nb) {
                built.graph.add_edge(na, nb, ());
            }
        }
        Ok(built)
    }

    /// Samples an Erdős–Rényi graph: each of the M(M−1)/2 member pairs
    /// gets an edge independently with probability `edge_prob`.
    ///
    /// Probabilities outside [0, 1] saturate. The same seed always yields
    /// the same graph.
    pub fn erdos_renyi(members: usize, edge_prob: f64, seed: u64) -> Self {
        let p = edge_prob.clamp(0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut built = Self::empty(members);
        for a in 0..members {
            for b in (a + 1)..members {
                if rng.gen::<f64>() < p {
                    built.graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
                }
            }
        }
        built
    }

    /// Number of members (nodes).
    pub fn member_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of interaction channels (edges).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether members `a` and `b` share a channel. Out-of-range indices
    /// simply have no edges.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a < self.member_count()
            && b < self.member_count()
            && self.graph.contains_edge(NodeIndex::new(a), NodeIndex::new(b))
    }

    /// Fraction of possible member pairs that are connected.
    ///
    /// Returns 0.0 for graphs with fewer than two members.
    pub fn edge_density(&self) -> f64 {
        let members = self.member_count();
        if members <= 1 {
            return 0.0;
        }
        let possible = (members * (members - 1)) as f64 / 2.0;
        self.edge_count() as f64 / possible
    }

    /// Mean local clustering coefficient over all members.
    ///
    /// Members with fewer than two neighbours contribute zero. Returns 0.0
    /// for the empty graph.
    pub fn average_clustering(&self) -> f64 {
        let members = self.member_count();
        if members == 0 {
            return 0.0;
        }
        let mut total = 0.0;
        for node in self.graph.node_indices() {
            let neighbours: Vec<NodeIndex> = self.graph.neighbors(node).collect();
            let degree = neighbours.len();
            if degree < 2 {
                continue;
            }
            let mut closed = 0usize;
            for i in 0..degree {
                for j in (i + 1)..degree {
                    if self.graph.contains_edge(neighbours[i], neighbours[j]) {
                        closed += 1;
                    }
                }
            }
            total += (2 * closed) as f64 / (degree * (degree - 1)) as f64;
        }
        total / members as f64
    }
}
