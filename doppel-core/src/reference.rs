//! Reference-distribution provider interface.
//!
//! The statistics themselves (average degrees per colour pair, colour
//! distributions per edge colour, target edge counts) are computed from
//! reference graphs by an external collaborator; this module defines the
//! trait the synthesizer consumes plus an in-memory table for callers that
//! precompute them.

use std::collections::HashMap;

use crate::colour::ColourKey;

/// Supplies the per-colour statistics the synthesizer mimics.
pub trait ReferenceDistributions {
    /// Average out-degree of `vertex_colour` vertices through
    /// `edge_colour` edges in the reference graphs.
    fn avg_out_degree(&self, vertex_colour: ColourKey, edge_colour: ColourKey) -> f64;

    /// Average in-degree of `vertex_colour` vertices through `edge_colour`
    /// edges in the reference graphs.
    fn avg_in_degree(&self, vertex_colour: ColourKey, edge_colour: ColourKey) -> f64;

    /// Weighted tail-colour distribution for `edge_colour`, or `None` when
    /// the reference carries no such edges.
    fn tail_colour_weights(&self, edge_colour: ColourKey) -> Option<&[(ColourKey, f64)]>;

    /// Weighted head-colour distribution for `edge_colour`.
    fn head_colour_weights(&self, edge_colour: ColourKey) -> Option<&[(ColourKey, f64)]>;

    /// Number of `edge_colour` edges the synthesized graph should contain.
    fn edge_target(&self, edge_colour: ColourKey) -> usize;

    /// Edge colours with a positive target, sorted by bit pattern so the
    /// synthesis loop visits them in a stable order.
    fn edge_colours(&self) -> Vec<ColourKey>;
}

/// An in-memory [`ReferenceDistributions`] implementation.
#[derive(Clone, Debug, Default)]
pub struct ReferenceTables {
    out_degrees: HashMap<(ColourKey, ColourKey), f64>,
    in_degrees: HashMap<(ColourKey, ColourKey), f64>,
    tail_weights: HashMap<ColourKey, Vec<(ColourKey, f64)>>,
    head_weights: HashMap<ColourKey, Vec<(ColourKey, f64)>>,
    edge_targets: HashMap<ColourKey, usize>,
}

impl ReferenceTables {
    /// Creates an empty set of tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the average out-degree for `(vertex_colour, edge_colour)`.
    pub fn set_avg_out_degree(
        &mut self,
        vertex_colour: ColourKey,
        edge_colour: ColourKey,
        degree: f64,
    ) {
        self.out_degrees.insert((vertex_colour, edge_colour), degree);
    }

    /// Records the average in-degree for `(vertex_colour, edge_colour)`.
    pub fn set_avg_in_degree(
        &mut self,
        vertex_colour: ColourKey,
        edge_colour: ColourKey,
        degree: f64,
    ) {
        self.in_degrees.insert((vertex_colour, edge_colour), degree);
    }

    /// Appends a weighted tail colour to `edge_colour`'s distribution.
    pub fn add_tail_colour_weight(
        &mut self,
        edge_colour: ColourKey,
        tail_colour: ColourKey,
        weight: f64,
    ) {
        self.tail_weights
            .entry(edge_colour)
            .or_default()
            .push((tail_colour, weight));
    }

    /// Appends a weighted head colour to `edge_colour`'s distribution.
    pub fn add_head_colour_weight(
        &mut self,
        edge_colour: ColourKey,
        head_colour: ColourKey,
        weight: f64,
    ) {
        self.head_weights
            .entry(edge_colour)
            .or_default()
            .push((head_colour, weight));
    }

    /// Sets the target edge count for `edge_colour`.
    pub fn set_edge_target(&mut self, edge_colour: ColourKey, target: usize) {
        self.edge_targets.insert(edge_colour, target);
    }
}

impl ReferenceDistributions for ReferenceTables {
    fn avg_out_degree(&self, vertex_colour: ColourKey, edge_colour: ColourKey) -> f64 {
        self.out_degrees
            .get(&(vertex_colour, edge_colour))
            .copied()
            .unwrap_or(0.0)
    }

    fn avg_in_degree(&self, vertex_colour: ColourKey, edge_colour: ColourKey) -> f64 {
        self.in_degrees
            .get(&(vertex_colour, edge_colour))
            .copied()
            .unwrap_or(0.0)
    }

    fn tail_colour_weights(&self, edge_colour: ColourKey) -> Option<&[(ColourKey, f64)]> {
        self.tail_weights.get(&edge_colour).map(Vec::as_slice)
    }

    fn head_colour_weights(&self, edge_colour: ColourKey) -> Option<&[(ColourKey, f64)]> {
        self.head_weights.get(&edge_colour).map(Vec::as_slice)
    }

    fn edge_target(&self, edge_colour: ColourKey) -> usize {
        self.edge_targets.get(&edge_colour).copied().unwrap_or(0)
    }

    fn edge_colours(&self) -> Vec<ColourKey> {
        let mut colours: Vec<ColourKey> = self
            .edge_targets
            .iter()
            .filter(|&(_, &target)| target > 0)
            .map(|(&colour, _)| colour)
            .collect();
        colours.sort_unstable_by_key(|colour| colour.bits());
        colours
    }
}
