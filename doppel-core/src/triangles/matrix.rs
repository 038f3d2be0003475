//! Matrix-power triangle counting.
//!
//! Builds the adjacency matrix of the undirected projection, raises it to
//! the third power, and sums the diagonal: each triangle contributes six
//! closed walks of length three. Valid only when no two vertices are joined
//! by more than one undirected edge; that precondition is documented, not
//! re-validated.

use crate::graph::ColouredMultigraph;

use super::projection::UndirectedProjection;

/// The cubic-adjacency-matrix triangle counter.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatrixTriangleCounter;

impl MatrixTriangleCounter {
    /// Creates the counter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Counts the triangles in the undirected projection of `graph`.
    ///
    /// Returns 0 without building a matrix when the graph has fewer than 3
    /// vertices or fewer than 3 edges.
    #[must_use]
    pub fn count(&self, graph: &ColouredMultigraph) -> u64 {
        if graph.vertex_count() < 3 || graph.edge_count() < 3 {
            return 0;
        }
        let projection = UndirectedProjection::from_graph(graph);
        let size = projection.vertex_count();
        let mut adjacency = vec![vec![0i64; size]; size];
        for (row_index, row) in adjacency.iter_mut().enumerate() {
            for (column_index, cell) in row.iter_mut().enumerate() {
                if projection.contains_edge(row_index, column_index) {
                    *cell = 1;
                }
            }
        }
        let squared = multiply(&adjacency, &adjacency);
        let cubed = multiply(&squared, &adjacency);
        let trace: i64 = (0..size)
            .filter_map(|index| cubed.get(index).and_then(|row| row.get(index)))
            .sum();
        (trace / 6) as u64
    }
}

fn multiply(left: &[Vec<i64>], right: &[Vec<i64>]) -> Vec<Vec<i64>> {
    let size = left.len();
    let mut product = vec![vec![0i64; size]; size];
    for (row_index, product_row) in product.iter_mut().enumerate() {
        let Some(left_row) = left.get(row_index) else {
            continue;
        };
        for (shared_index, &left_cell) in left_row.iter().enumerate() {
            if left_cell == 0 {
                continue;
            }
            let Some(right_row) = right.get(shared_index) else {
                continue;
            };
            for (column_index, &right_cell) in right_row.iter().enumerate() {
                if let Some(cell) = product_row.get_mut(column_index) {
                    *cell += left_cell * right_cell;
                }
            }
        }
    }
    product
}
