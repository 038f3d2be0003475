//! The coloured directed multigraph store.
//!
//! Vertices are dense `usize` ids; edges carry [`EdgeId`]s drawn from a
//! monotone counter, so an edge id is never reused — removing an edge and
//! re-adding the same endpoints and colour yields a fresh id. Both vertices
//! and edges carry a [`ColourKey`].

use std::collections::{HashMap, HashSet};

use crate::colour::ColourKey;


/// Errors raised by graph-store operations.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    /// An operation referenced a vertex id that is not in the graph.
    #[error("vertex {vertex} is out of bounds, vertex_count is {vertex_count}")]
    UnknownVertex {
        /// The out-of-range vertex id.
        vertex: usize,
        /// The number of vertices in the graph.
        vertex_count: usize,
    },
    /// An operation referenced an edge id that is not (or no longer) live.
    #[error("edge {edge:?} is not in the graph")]
    UnknownEdge {
        /// The dead or unknown edge id.
        edge: EdgeId,
    },
}

/// A unique identifier for an edge.
///
/// Ids are allocated from a monotone counter and never reused, so snapshots
/// referencing a removed edge can never alias a later edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Returns the raw counter value, for diagnostics.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// The endpoints and colour of one directed edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    /// Source vertex id.
    pub tail: usize,
    /// Target vertex id.
    pub head: usize,
    /// Edge colour.
    pub colour: ColourKey,
}

/// A mutable directed multigraph with coloured vertices and edges.
///
/// # Examples
/// ```
/// use doppel_core::{ColourKey, ColouredMultigraph};
///
/// let person = ColourKey::from_flag(0);
/// let knows = ColourKey::from_flag(1);
/// let mut graph = ColouredMultigraph::new();
/// let alice = graph.add_vertex(person);
/// let bob = graph.add_vertex(person);
/// let edge = graph.add_edge(alice, bob, knows).expect("vertices exist");
/// assert_eq!(graph.edge_count(), 1);
/// graph.remove_edge(edge).expect("edge is live");
/// let replacement = graph.add_edge(alice, bob, knows).expect("vertices exist");
/// assert_ne!(edge, replacement);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ColouredMultigraph {
    vertex_colours: Vec<ColourKey>,
    colour_index: HashMap<ColourKey, Vec<usize>>,
    edges: HashMap<EdgeId, EdgeRecord>,
    out_adjacency: Vec<Vec<EdgeId>>,
    in_adjacency: Vec<Vec<EdgeId>>,
    next_edge: u64,
}

impl ColouredMultigraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with one vertex per entry of `colours`.
    #[must_use]
    pub fn with_vertices(colours: &[ColourKey]) -> Self {
        let mut graph = Self::new();
        for &colour in colours {
            graph.add_vertex(colour);
        }
        graph
    }

    /// Adds a vertex with the given colour and returns its id.
    pub fn add_vertex(&mut self, colour: ColourKey) -> usize {
        let vertex = self.vertex_colours.len();
        self.vertex_colours.push(colour);
        self.colour_index.entry(colour).or_default().push(vertex);
        self.out_adjacency.push(Vec::new());
        self.in_adjacency.push(Vec::new());
        vertex
    }

    /// Adds a directed edge and returns its freshly allocated id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] when either endpoint is out of
    /// range.
    pub fn add_edge(
        &mut self,
        tail: usize,
        head: usize,
        colour: ColourKey,
    ) -> Result<EdgeId, GraphError> {
        self.check_vertex(tail)?;
        self.check_vertex(head)?;
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.insert(id, EdgeRecord { tail, head, colour });
        if let Some(out) = self.out_adjacency.get_mut(tail) {
            out.push(id);
        }
        if let Some(incoming) = self.in_adjacency.get_mut(head) {
            incoming.push(id);
        }
        Ok(id)
    }

    /// Removes a live edge and returns its record.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownEdge`] when the id is not live.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<EdgeRecord, GraphError> {
        let record = self
            .edges
            .remove(&edge)
            .ok_or(GraphError::UnknownEdge { edge })?;
        if let Some(out) = self.out_adjacency.get_mut(record.tail) {
            out.retain(|&id| id != edge);
        }
        if let Some(incoming) = self.in_adjacency.get_mut(record.head) {
            incoming.retain(|&id| id != edge);
        }
        Ok(record)
    }

    /// Returns the record of a live edge.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&EdgeRecord> {
        self.edges.get(&edge)
    }

    /// Returns the colour of a vertex, or `None` when out of range.
    #[must_use]
    pub fn vertex_colour(&self, vertex: usize) -> Option<ColourKey> {
        self.vertex_colours.get(vertex).copied()
    }

    /// Returns the ids of all vertices carrying `colour`.
    #[must_use]
    pub fn vertices_of_colour(&self, colour: ColourKey) -> &[usize] {
        self.colour_index.get(&colour).map_or(&[], Vec::as_slice)
    }

    /// Returns the distinct vertex colours present in the graph.
    ///
    /// The result is sorted by bit pattern so iteration order is stable.
    #[must_use]
    pub fn vertex_colours_present(&self) -> Vec<ColourKey> {
        let mut colours: Vec<ColourKey> = self.colour_index.keys().copied().collect();
        colours.sort_unstable_by_key(|colour| colour.bits());
        colours
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_colours.len()
    }

    /// Returns the number of live directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of live edges carrying `colour`.
    #[must_use]
    pub fn edges_of_colour_count(&self, colour: ColourKey) -> usize {
        self.edges
            .values()
            .filter(|record| record.colour == colour)
            .count()
    }

    /// Iterates over the live edges in unspecified order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeRecord)> {
        self.edges.iter().map(|(&id, record)| (id, record))
    }

    /// Iterates over the edge ids leaving `vertex`.
    pub fn out_edges(&self, vertex: usize) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_adjacency
            .get(vertex)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .copied()
    }

    /// Iterates over the edge ids entering `vertex`.
    pub fn in_edges(&self, vertex: usize) -> impl Iterator<Item = EdgeId> + '_ {
        self.in_adjacency
            .get(vertex)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .copied()
    }

    /// Returns the heads already reached from `tail` through edges of
    /// `edge_colour`.
    ///
    /// The synthesizer uses this to avoid committing a duplicate
    /// `(tail, colour, head)` edge.
    #[must_use]
    pub fn connected_heads(&self, tail: usize, edge_colour: ColourKey) -> HashSet<usize> {
        self.out_edges(tail)
            .filter_map(|id| self.edges.get(&id))
            .filter(|record| record.colour == edge_colour)
            .map(|record| record.head)
            .collect()
    }

    /// Returns the distinct undirected neighbours of `vertex`.
    ///
    /// Self-loops do not contribute a neighbour.
    #[must_use]
    pub fn undirected_neighbours(&self, vertex: usize) -> HashSet<usize> {
        let mut neighbours = HashSet::new();
        for id in self.out_edges(vertex) {
            if let Some(record) = self.edges.get(&id) {
                if record.head != vertex {
                    neighbours.insert(record.head);
                }
            }
        }
        for id in self.in_edges(vertex) {
            if let Some(record) = self.edges.get(&id) {
                if record.tail != vertex {
                    neighbours.insert(record.tail);
                }
            }
        }
        neighbours
    }

    /// Returns the number of edges joining `u` and `v` in either direction.
    #[must_use]
    pub fn undirected_multiplicity(&self, u: usize, v: usize) -> usize {
        if u == v {
            return 0;
        }
        self.out_edges(u)
            .chain(self.out_edges(v))
            .filter_map(|id| self.edges.get(&id))
            .filter(|record| {
                (record.tail == u && record.head == v) || (record.tail == v && record.head == u)
            })
            .count()
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if vertex < self.vertex_colours.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownVertex {
                vertex,
                vertex_count: self.vertex_colours.len(),
            })
        }
    }
}
