//! What-if engine for single-edge graph changes.
//!
//! [`EdgeModifier`] owns a graph and a metric battery. A `try_*` call
//! applies one candidate change, measures every metric against the mutated
//! graph, then applies the captured inverse before returning, so the graph
//! outside a call is always in its committed state. The reserved triangle
//! metrics are served from [`EdgeModification`]'s incremental counts; all
//! others are recomputed from scratch. A measured candidate becomes
//! permanent only through `execute_remove` / `execute_add`.
//!
//! Invalid candidates (no edge id, missing endpoints or colour, stale ids)
//! never raise; they return the current snapshot unchanged.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    graph::ColouredMultigraph,
    metrics::{EDGE_TRIANGLES_NAME, Metric, NODE_TRIANGLES_NAME, is_reserved_name},
    modification::{EdgeModification, EdgeProposal},
};


/// A named snapshot of metric values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricValues {
    values: HashMap<String, f64>,
}

impl MetricValues {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value recorded under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Records `value` under `name`, replacing any previous value.
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_owned(), value);
    }

    /// Returns the number of recorded values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Measures metric deltas of single-edge changes without committing them.
pub struct EdgeModifier {
    graph: ColouredMultigraph,
    metrics: Vec<Box<dyn Metric>>,
    modification: EdgeModification,
    original: MetricValues,
    current: MetricValues,
    removed: Vec<EdgeProposal>,
    added: Vec<EdgeProposal>,
}

impl EdgeModifier {
    /// Takes ownership of `graph`, counts its triangles once, and freezes
    /// the baseline snapshot of every metric.
    ///
    /// The two reserved triangle entries are always present in snapshots;
    /// when no metric requests them they stay zero-filled.
    #[must_use]
    pub fn new(graph: ColouredMultigraph, metrics: Vec<Box<dyn Metric>>) -> Self {
        let modification = EdgeModification::from_graph(&graph);
        let mut modifier = Self {
            graph,
            metrics,
            modification,
            original: MetricValues::new(),
            current: MetricValues::new(),
            removed: Vec::new(),
            added: Vec::new(),
        };
        modifier.original = modifier.measure();
        modifier.current = modifier.original.clone();
        modifier
    }

    /// Measures the metric values a removal of `proposal`'s edge would
    /// produce, leaving the graph unchanged on return.
    ///
    /// A proposal with no edge id, or with an id that is not live, is a
    /// no-op returning the current snapshot.
    pub fn try_remove(&mut self, proposal: &EdgeProposal) -> MetricValues {
        let Some(edge_id) = proposal.edge_id else {
            return self.current.clone();
        };
        let Ok(record) = self.modification.remove_edge(&mut self.graph, edge_id) else {
            return self.current.clone();
        };
        let values = self.measure();
        // Reversal allocates a fresh id; the history entry must track it so
        // a later execute_remove targets the live edge.
        let mut entry = *proposal;
        match self
            .modification
            .add_edge(&mut self.graph, record.tail, record.head, record.colour)
        {
            Ok(fresh) => entry.edge_id = Some(fresh),
            Err(_) => entry.edge_id = None,
        }
        self.removed.push(entry);
        debug!(edge = edge_id.value(), "measured speculative removal");
        values
    }

    /// Measures the metric values an addition of `proposal`'s edge would
    /// produce, leaving the graph unchanged on return.
    ///
    /// A proposal missing either endpoint or the edge colour, or naming an
    /// unknown vertex, is a no-op returning the current snapshot.
    pub fn try_add(&mut self, proposal: &EdgeProposal) -> MetricValues {
        let (Some(tail), Some(head), Some(colour)) =
            (proposal.tail_id, proposal.head_id, proposal.edge_colour)
        else {
            return self.current.clone();
        };
        let Ok(edge_id) = self.modification.add_edge(&mut self.graph, tail, head, colour) else {
            return self.current.clone();
        };
        let values = self.measure();
        // Must succeed: the id was allocated four lines up.
        let _ = self.modification.remove_edge(&mut self.graph, edge_id);
        let mut entry = *proposal;
        entry.edge_id = None;
        self.added.push(entry);
        debug!(tail, head, "measured speculative addition");
        values
    }

    /// Permanently applies the most recently tried removal.
    ///
    /// A no-op when nothing was tried or the last tried removal was
    /// already executed.
    pub fn execute_remove(&mut self) {
        let Some(entry) = self.removed.last_mut() else {
            return;
        };
        let Some(edge_id) = entry.edge_id else {
            return;
        };
        if self
            .modification
            .remove_edge(&mut self.graph, edge_id)
            .is_ok()
        {
            entry.edge_id = None;
        }
    }

    /// Permanently applies the most recently tried addition.
    ///
    /// A no-op when nothing was tried or the last tried addition was
    /// already executed.
    pub fn execute_add(&mut self) {
        let Some(entry) = self.added.last_mut() else {
            return;
        };
        if entry.edge_id.is_some() {
            return;
        }
        let (Some(tail), Some(head), Some(colour)) =
            (entry.tail_id, entry.head_id, entry.edge_colour)
        else {
            return;
        };
        if let Ok(edge_id) = self.modification.add_edge(&mut self.graph, tail, head, colour) {
            entry.edge_id = Some(edge_id);
        }
    }

    /// Accepts `values` as the current snapshot.
    pub fn update_metric_values(&mut self, values: MetricValues) {
        self.current = values;
    }

    /// The baseline snapshot frozen at construction.
    #[must_use]
    pub fn original_metric_values(&self) -> &MetricValues {
        &self.original
    }

    /// The most recently accepted snapshot.
    #[must_use]
    pub fn optimized_metric_values(&self) -> &MetricValues {
        &self.current
    }

    /// The graph in its committed state.
    #[must_use]
    pub fn graph(&self) -> &ColouredMultigraph {
        &self.graph
    }

    /// Consumes the modifier and yields the graph.
    #[must_use]
    pub fn into_graph(self) -> ColouredMultigraph {
        self.graph
    }

    fn measure(&self) -> MetricValues {
        let mut values = MetricValues::new();
        values.set(NODE_TRIANGLES_NAME, 0.0);
        values.set(EDGE_TRIANGLES_NAME, 0.0);
        for metric in &self.metrics {
            let name = metric.name();
            let value = if !is_reserved_name(name) {
                metric.apply(&self.graph)
            } else if name.eq_ignore_ascii_case(NODE_TRIANGLES_NAME) {
                self.modification.node_triangles() as f64
            } else {
                self.modification.edge_triangles() as f64
            };
            values.set(name, value);
        }
        values
    }
}

impl std::fmt::Debug for EdgeModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeModifier")
            .field("graph", &self.graph)
            .field(
                "metrics",
                &self.metrics.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("removed", &self.removed)
            .field("added", &self.added)
            .finish_non_exhaustive()
    }
}
