//! Property-based tests for the triangle counters.
//!
//! Verifies the required equivalence between the node-iterator and
//! matrix-power algorithms on randomly generated simple projections, and
//! that the multiplicity-weighted counter collapses to the node count on
//! simple graphs.

mod strategies;
