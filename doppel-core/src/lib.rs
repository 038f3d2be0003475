//! Doppel core library.
//!
//! Synthesizes artificial coloured multigraphs that statistically mimic
//! reference graphs, and evaluates the effect of speculative single-edge
//! mutations on a battery of graph metrics.

mod budget;
mod colour;
mod error;
mod graph;
mod metrics;
mod modification;
mod modifier;
mod poisson;
mod proposer;
mod reference;
mod rules;
mod synthesis;
mod triangles;

pub use crate::{
    budget::{BudgetError, DegreeBudgetBuilder, DegreeBudgets, DegreeRole},
    colour::ColourKey,
    error::{DoppelError, DoppelErrorCode, Result},
    graph::{ColouredMultigraph, EdgeId, EdgeRecord, GraphError},
    metrics::{
        AvgClusteringCoefficientMetric, AvgVertexDegreeMetric, EdgeCountMetric,
        EdgeTrianglesMetric, Metric, NodeTrianglesMetric, VertexCountMetric,
        EDGE_TRIANGLES_NAME, NODE_TRIANGLES_NAME,
    },
    modification::{EdgeModification, EdgeProposal},
    modifier::{EdgeModifier, MetricValues},
    poisson::sample_poisson,
    proposer::{CategoricalProposer, DistributionError},
    reference::{ReferenceDistributions, ReferenceTables},
    rules::{ColourRuleTable, ColourRules},
    synthesis::{
        ColourOutcome, GraphSynthesizer, SynthesisReport, SynthesizerConfig,
        MAX_ATTEMPTS_PER_COLOUR,
    },
    triangles::{
        EdgeTriangleCounter, LocalClustering, MatrixTriangleCounter, NodeIteratorCounter,
        UndirectedProjection,
    },
};
