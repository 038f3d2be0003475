//! Strategy builders for triangle-counter property tests.

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Smallest generated graph (below 3 the matrix counter short-circuits).
const MIN_VERTICES: usize = 3;
/// Largest generated graph; cubing the adjacency matrix stays cheap.
const MAX_VERTICES: usize = 24;

/// A randomly generated simple directed graph.
#[derive(Clone, Debug)]
pub(super) struct SimpleGraphFixture {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Directed edges; at most one per unordered vertex pair, so the
    /// undirected projection is simple.
    pub edges: Vec<(usize, usize)>,
}

/// Generates simple graphs across sparse and dense edge probabilities.
pub(super) fn simple_graph_strategy() -> impl Strategy<Value = SimpleGraphFixture> {
    (any::<u64>(), MIN_VERTICES..=MAX_VERTICES).prop_map(|(seed, vertex_count)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        let edge_probability: f64 = rng.gen_range(0.1..0.8);
        let mut edges = Vec::new();
        for tail in 0..vertex_count {
            for head in (tail + 1)..vertex_count {
                if rng.gen_bool(edge_probability) {
                    // Random orientation; the projection ignores direction.
                    if rng.gen_bool(0.5) {
                        edges.push((tail, head));
                    } else {
                        edges.push((head, tail));
                    }
                }
            }
        }
        SimpleGraphFixture {
            vertex_count,
            edges,
        }
    })
}
