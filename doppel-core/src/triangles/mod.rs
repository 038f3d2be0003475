//! Triangle counting over the undirected projection of a coloured
//! multigraph.
//!
//! Two independent algorithms are provided: the Schank–Wagner
//! node-iterator ([`NodeIteratorCounter`]) and an adjacency-matrix cube
//! ([`MatrixTriangleCounter`]). Both must agree on every simple projection;
//! the property suite checks that equivalence. A third counter
//! ([`EdgeTriangleCounter`]) weights each triangle by the product of its
//! pair multiplicities, which the what-if engine tracks incrementally.

mod edge_iterator;
mod matrix;
mod node_iterator;
mod projection;
#[cfg(test)]
mod property;

pub use self::{
    edge_iterator::EdgeTriangleCounter,
    matrix::MatrixTriangleCounter,
    node_iterator::{LocalClustering, NodeIteratorCounter},
    projection::UndirectedProjection,
};
