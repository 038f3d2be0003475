//! Single-edge graph mutation with incremental triangle tracking.
//!
//! [`EdgeModification`] applies one edge insertion or removal at a time and
//! keeps the node- and edge-triangle totals current by recomputing only the
//! delta attributable to the touched edge: the common undirected
//! neighbourhood of its endpoints. Rollback is not handled here; the
//! what-if protocol around it lives in [`crate::EdgeModifier`].

use crate::{
    colour::ColourKey,
    graph::{ColouredMultigraph, EdgeId, EdgeRecord, GraphError},
    triangles::{EdgeTriangleCounter, NodeIteratorCounter},
};


/// A candidate single-edge change: endpoints, colours, and the edge id once
/// one exists.
///
/// Created by the synthesizer or the caller per candidate edge and consumed
/// by the what-if engine; retained only in its append-only histories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeProposal {
    /// Tail vertex id, when known.
    pub tail_id: Option<usize>,
    /// Head vertex id, when known.
    pub head_id: Option<usize>,
    /// The live edge id, once the edge exists in the graph.
    pub edge_id: Option<EdgeId>,
    /// Tail vertex colour, when known.
    pub tail_colour: Option<ColourKey>,
    /// Head vertex colour, when known.
    pub head_colour: Option<ColourKey>,
    /// Edge colour, when known.
    pub edge_colour: Option<ColourKey>,
}

impl EdgeProposal {
    /// A proposal to add a new edge.
    #[must_use]
    pub fn addition(tail_id: usize, head_id: usize, edge_colour: ColourKey) -> Self {
        Self {
            tail_id: Some(tail_id),
            head_id: Some(head_id),
            edge_colour: Some(edge_colour),
            ..Self::default()
        }
    }

    /// A proposal to remove the live edge `edge_id` of `graph`.
    ///
    /// Returns a proposal with no edge id when the edge is not live, which
    /// downstream consumers treat as a no-op candidate.
    #[must_use]
    pub fn removal(graph: &ColouredMultigraph, edge_id: EdgeId) -> Self {
        graph.edge(edge_id).map_or_else(Self::default, |record| Self {
            tail_id: Some(record.tail),
            head_id: Some(record.head),
            edge_id: Some(edge_id),
            tail_colour: graph.vertex_colour(record.tail),
            head_colour: graph.vertex_colour(record.head),
            edge_colour: Some(record.colour),
        })
    }
}

/// Tracks the triangle totals across single-edge mutations.
#[derive(Clone, Debug, Default)]
pub struct EdgeModification {
    node_triangles: u64,
    edge_triangles: u64,
}

impl EdgeModification {
    /// Creates a tracker seeded with externally computed totals.
    #[must_use]
    pub fn with_counts(node_triangles: u64, edge_triangles: u64) -> Self {
        Self {
            node_triangles,
            edge_triangles,
        }
    }

    /// Creates a tracker by counting `graph` from scratch.
    #[must_use]
    pub fn from_graph(graph: &ColouredMultigraph) -> Self {
        Self {
            node_triangles: NodeIteratorCounter::new().count(graph),
            edge_triangles: EdgeTriangleCounter::new().count(graph),
        }
    }

    /// The current node-triangle total.
    #[must_use]
    pub fn node_triangles(&self) -> u64 {
        self.node_triangles
    }

    /// The current multiplicity-weighted edge-triangle total.
    #[must_use]
    pub fn edge_triangles(&self) -> u64 {
        self.edge_triangles
    }

    /// Adds an edge to `graph` and updates both triangle totals from the
    /// endpoints' common neighbourhood.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] when either endpoint is out of
    /// range; the totals are untouched in that case.
    pub fn add_edge(
        &mut self,
        graph: &mut ColouredMultigraph,
        tail: usize,
        head: usize,
        colour: ColourKey,
    ) -> Result<EdgeId, GraphError> {
        let was_fresh_pair = tail != head && graph.undirected_multiplicity(tail, head) == 0;
        let (closing_pairs, weighted) = common_neighbourhood(graph, tail, head);
        let edge = graph.add_edge(tail, head, colour)?;
        if was_fresh_pair {
            self.node_triangles += closing_pairs;
        }
        self.edge_triangles += weighted;
        Ok(edge)
    }

    /// Removes an edge from `graph` and updates both triangle totals.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownEdge`] when the id is not live; the
    /// totals are untouched in that case.
    pub fn remove_edge(
        &mut self,
        graph: &mut ColouredMultigraph,
        edge: EdgeId,
    ) -> Result<EdgeRecord, GraphError> {
        let record = graph.remove_edge(edge)?;
        let pair_is_gone =
            record.tail != record.head && graph.undirected_multiplicity(record.tail, record.head) == 0;
        let (closing_pairs, weighted) = common_neighbourhood(graph, record.tail, record.head);
        if pair_is_gone {
            self.node_triangles -= closing_pairs;
        }
        self.edge_triangles -= weighted;
        Ok(record)
    }
}

/// Counts the triangles one `(tail, head)` edge would close against the
/// current graph state: the number of common undirected neighbours, and the
/// same sum weighted by the multiplicity product of the two closing sides.
fn common_neighbourhood(graph: &ColouredMultigraph, tail: usize, head: usize) -> (u64, u64) {
    if tail == head {
        return (0, 0);
    }
    let tail_neighbours = graph.undirected_neighbours(tail);
    let head_neighbours = graph.undirected_neighbours(head);
    let mut closing_pairs = 0u64;
    let mut weighted = 0u64;
    for &shared in tail_neighbours.intersection(&head_neighbours) {
        if shared == tail || shared == head {
            continue;
        }
        closing_pairs += 1;
        weighted += graph.undirected_multiplicity(tail, shared) as u64
            * graph.undirected_multiplicity(head, shared) as u64;
    }
    (closing_pairs, weighted)
}
