//! Pluggable single-value graph metrics.
//!
//! A [`Metric`] is a named pure function from a graph to a scalar. The two
//! triangle metrics carry reserved names that the what-if engine recognizes
//! (case-insensitively) and serves incrementally instead of recomputing.

use crate::{
    graph::ColouredMultigraph,
    triangles::{EdgeTriangleCounter, NodeIteratorCounter},
};

/// Reserved name of the node-triangle metric.
pub const NODE_TRIANGLES_NAME: &str = "#nodetriangles";

/// Reserved name of the edge-triangle metric.
pub const EDGE_TRIANGLES_NAME: &str = "#edgetriangles";

/// A named, pure graph metric.
///
/// `apply` must not panic and must not mutate outside state: the what-if
/// engine calls it between a speculative mutation and its reversal.
pub trait Metric {
    /// The metric's name, used as the key of metric snapshots.
    fn name(&self) -> &str;

    /// Computes the metric against the current graph state.
    fn apply(&self, graph: &ColouredMultigraph) -> f64;
}

/// Returns `true` when `name` is one of the reserved triangle metrics.
#[must_use]
pub(crate) fn is_reserved_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(NODE_TRIANGLES_NAME) || name.eq_ignore_ascii_case(EDGE_TRIANGLES_NAME)
}

/// Counts node triangles via the node-iterator algorithm.
#[derive(Clone, Debug, Default)]
pub struct NodeTrianglesMetric {
    counter: NodeIteratorCounter,
}

impl NodeTrianglesMetric {
    /// Creates the metric.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for NodeTrianglesMetric {
    fn name(&self) -> &str {
        NODE_TRIANGLES_NAME
    }

    fn apply(&self, graph: &ColouredMultigraph) -> f64 {
        self.counter.count(graph) as f64
    }
}

/// Counts multiplicity-weighted edge triangles.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeTrianglesMetric;

impl EdgeTrianglesMetric {
    /// Creates the metric.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Metric for EdgeTrianglesMetric {
    fn name(&self) -> &str {
        EDGE_TRIANGLES_NAME
    }

    fn apply(&self, graph: &ColouredMultigraph) -> f64 {
        EdgeTriangleCounter::new().count(graph) as f64
    }
}

/// The number of vertices.
#[derive(Clone, Copy, Debug, Default)]
pub struct VertexCountMetric;

impl Metric for VertexCountMetric {
    fn name(&self) -> &str {
        "#vertices"
    }

    fn apply(&self, graph: &ColouredMultigraph) -> f64 {
        graph.vertex_count() as f64
    }
}

/// The number of directed edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeCountMetric;

impl Metric for EdgeCountMetric {
    fn name(&self) -> &str {
        "#edges"
    }

    fn apply(&self, graph: &ColouredMultigraph) -> f64 {
        graph.edge_count() as f64
    }
}

/// Average vertex degree: directed edges over vertices.
#[derive(Clone, Copy, Debug, Default)]
pub struct AvgVertexDegreeMetric;

impl Metric for AvgVertexDegreeMetric {
    fn name(&self) -> &str {
        "avrgDegree"
    }

    fn apply(&self, graph: &ColouredMultigraph) -> f64 {
        if graph.vertex_count() == 0 {
            return 0.0;
        }
        graph.edge_count() as f64 / graph.vertex_count() as f64
    }
}

/// Average local clustering coefficient over all vertices.
///
/// Vertices with no triangle (including degree < 2) contribute zero.
#[derive(Clone, Debug, Default)]
pub struct AvgClusteringCoefficientMetric {
    counter: NodeIteratorCounter,
}

impl AvgClusteringCoefficientMetric {
    /// Creates the metric.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for AvgClusteringCoefficientMetric {
    fn name(&self) -> &str {
        "avgClusterCoefficient"
    }

    fn apply(&self, graph: &ColouredMultigraph) -> f64 {
        let (_, clustering) = self.counter.count_with_clustering(graph);
        clustering.average_over(graph.vertex_count())
    }
}

#[cfg(test)]
mod tests {
    use crate::{colour::ColourKey, graph::ColouredMultigraph};

    use super::{
        AvgClusteringCoefficientMetric, AvgVertexDegreeMetric, EdgeCountMetric,
        EdgeTrianglesMetric, Metric, NodeTrianglesMetric, VertexCountMetric, is_reserved_name,
    };

    fn triangle_graph() -> ColouredMultigraph {
        let vertex = ColourKey::from_flag(0);
        let link = ColourKey::from_flag(4);
        let mut graph = ColouredMultigraph::with_vertices(&[vertex; 3]);
        graph.add_edge(0, 1, link).expect("vertices exist");
        graph.add_edge(1, 2, link).expect("vertices exist");
        graph.add_edge(2, 0, link).expect("vertices exist");
        graph
    }

    #[test]
    fn reserved_names_match_case_insensitively() {
        assert!(is_reserved_name("#nodetriangles"));
        assert!(is_reserved_name("#NodeTriangles"));
        assert!(is_reserved_name("#EDGETRIANGLES"));
        assert!(!is_reserved_name("#edges"));
    }

    #[test]
    fn metric_battery_on_a_triangle() {
        let graph = triangle_graph();
        assert_eq!(NodeTrianglesMetric::new().apply(&graph), 1.0);
        assert_eq!(EdgeTrianglesMetric::new().apply(&graph), 1.0);
        assert_eq!(VertexCountMetric.apply(&graph), 3.0);
        assert_eq!(EdgeCountMetric.apply(&graph), 3.0);
        assert_eq!(AvgVertexDegreeMetric.apply(&graph), 1.0);
        // Every vertex closes the single triangle: coefficient 1 each.
        assert_eq!(AvgClusteringCoefficientMetric::new().apply(&graph), 1.0);
    }

    #[test]
    fn avg_degree_of_empty_graph_is_zero() {
        let graph = ColouredMultigraph::new();
        assert_eq!(AvgVertexDegreeMetric.apply(&graph), 0.0);
        assert_eq!(AvgClusteringCoefficientMetric::new().apply(&graph), 0.0);
    }
}
