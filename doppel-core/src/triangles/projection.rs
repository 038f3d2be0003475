//! The undirected projection of a directed multigraph.

use std::collections::HashMap;

use crate::graph::ColouredMultigraph;

/// An undirected view of a coloured multigraph: vertices `u` and `v` are
/// adjacent when an edge joins them in either direction. Pair
/// multiplicities (the number of directed edges between the pair) are
/// tracked separately from adjacency. Self-loops are dropped.
#[derive(Clone, Debug)]
pub struct UndirectedProjection {
    adjacency: Vec<HashMap<usize, usize>>,
    simple_edge_count: usize,
}

impl UndirectedProjection {
    /// Builds the projection of `graph`.
    #[must_use]
    pub fn from_graph(graph: &ColouredMultigraph) -> Self {
        let mut adjacency: Vec<HashMap<usize, usize>> =
            vec![HashMap::new(); graph.vertex_count()];
        let mut simple_edge_count = 0;
        for (_, record) in graph.edges() {
            if record.tail == record.head {
                continue;
            }
            if let Some(row) = adjacency.get_mut(record.tail) {
                let multiplicity = row.entry(record.head).or_insert(0);
                if *multiplicity == 0 {
                    simple_edge_count += 1;
                }
                *multiplicity += 1;
            }
            if let Some(row) = adjacency.get_mut(record.head) {
                *row.entry(record.tail).or_insert(0) += 1;
            }
        }
        Self {
            adjacency,
            simple_edge_count,
        }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of distinct undirected edges.
    #[must_use]
    pub fn simple_edge_count(&self) -> usize {
        self.simple_edge_count
    }

    /// Returns `true` when `u` and `v` are adjacent.
    #[must_use]
    pub fn contains_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency
            .get(u)
            .is_some_and(|row| row.contains_key(&v))
    }

    /// Returns the number of directed edges joining `u` and `v`.
    #[must_use]
    pub fn multiplicity(&self, u: usize, v: usize) -> usize {
        self.adjacency
            .get(u)
            .and_then(|row| row.get(&v))
            .copied()
            .unwrap_or(0)
    }

    /// Returns the distinct neighbours of `vertex`, sorted by id.
    #[must_use]
    pub fn neighbours(&self, vertex: usize) -> Vec<usize> {
        let mut neighbours: Vec<usize> = self
            .adjacency
            .get(vertex)
            .map(|row| row.keys().copied().collect())
            .unwrap_or_default();
        neighbours.sort_unstable();
        neighbours
    }

    /// Returns the undirected degree of `vertex` (distinct neighbours).
    #[must_use]
    pub fn degree(&self, vertex: usize) -> usize {
        self.adjacency.get(vertex).map_or(0, HashMap::len)
    }

    /// Returns `true` when no pair is joined by more than one edge.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.adjacency
            .iter()
            .all(|row| row.values().all(|&multiplicity| multiplicity == 1))
    }
}
