//! Weighted categorical sampling over a fixed domain.
//!
//! A [`CategoricalProposer`] draws items with replacement, proportionally to
//! caller-supplied non-negative weights, optionally restricted to a subset of
//! the domain at draw time. Restriction misses are soft: the draw yields
//! `None` and the caller decides whether to retry or abort.

use std::collections::HashSet;
use std::hash::Hash;

use rand::Rng;

/// Errors raised while constructing a categorical distribution.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum DistributionError {
    /// Item and weight sequences had different lengths.
    #[error("distribution has {items} items but {weights} weights")]
    LengthMismatch {
        /// Number of items supplied.
        items: usize,
        /// Number of weights supplied.
        weights: usize,
    },
    /// Every supplied weight was zero, so nothing can ever be drawn.
    #[error("distribution carries no positive weight")]
    ZeroMass,
    /// A weight was negative or non-finite.
    #[error("weight at index {index} is invalid: {weight}")]
    InvalidWeight {
        /// Position of the offending weight.
        index: usize,
        /// The offending weight value.
        weight: f64,
    },
}

/// A weight-proportional sampler over a fixed set of items.
///
/// # Examples
/// ```
/// use doppel_core::CategoricalProposer;
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let proposer = CategoricalProposer::new(vec!["a", "b"], vec![1.0, 0.0])
///     .expect("distribution is valid");
/// let mut rng = SmallRng::seed_from_u64(7);
/// // "b" carries no weight, so only "a" can ever be drawn.
/// assert_eq!(proposer.sample(&mut rng), Some(&"a"));
/// ```
#[derive(Clone, Debug)]
pub struct CategoricalProposer<T> {
    items: Vec<T>,
    weights: Vec<f64>,
    total_weight: f64,
}

impl<T: Eq + Hash> CategoricalProposer<T> {
    /// Builds a proposer from parallel item and weight sequences.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::LengthMismatch`] when the sequences have
    /// different lengths, [`DistributionError::InvalidWeight`] when a weight
    /// is negative or non-finite, and [`DistributionError::ZeroMass`] when no
    /// weight is positive.
    pub fn new(items: Vec<T>, weights: Vec<f64>) -> Result<Self, DistributionError> {
        if items.len() != weights.len() {
            return Err(DistributionError::LengthMismatch {
                items: items.len(),
                weights: weights.len(),
            });
        }
        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DistributionError::InvalidWeight { index, weight });
            }
        }
        let total_weight: f64 = weights.iter().sum();
        if total_weight <= 0.0 {
            return Err(DistributionError::ZeroMass);
        }
        Ok(Self {
            items,
            weights,
            total_weight,
        })
    }

    /// Draws one item with probability proportional to its weight.
    ///
    /// Returns `None` only for the degenerate case where floating-point
    /// accumulation never reaches the drawn threshold; in practice a valid
    /// proposer always yields an item.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let threshold: f64 = rng.gen_range(0.0..self.total_weight);
        self.pick(threshold, |_| true)
    }

    /// Draws one item from the intersection of the domain and `allowed`,
    /// renormalizing weights over that intersection.
    ///
    /// Yields `None` when the intersection carries no positive weight. This
    /// is a soft sampling failure, never an error: callers retry or abort.
    pub fn sample_restricted<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        allowed: &HashSet<T>,
    ) -> Option<&T> {
        let restricted_mass: f64 = self
            .items
            .iter()
            .zip(&self.weights)
            .filter(|(item, _)| allowed.contains(item))
            .map(|(_, &weight)| weight)
            .sum();
        if restricted_mass <= 0.0 {
            return None;
        }
        let threshold: f64 = rng.gen_range(0.0..restricted_mass);
        self.pick(threshold, |item| allowed.contains(item))
    }

    /// Walks the cumulative weights of items accepted by `keep` until the
    /// running total exceeds `threshold`.
    fn pick(&self, threshold: f64, keep: impl Fn(&T) -> bool) -> Option<&T> {
        let mut cumulative = 0.0f64;
        let mut last = None;
        for (item, &weight) in self.items.iter().zip(&self.weights) {
            if weight <= 0.0 || !keep(item) {
                continue;
            }
            cumulative += weight;
            last = Some(item);
            if threshold < cumulative {
                return Some(item);
            }
        }
        // Rounding in the cumulative sum can leave the threshold marginally
        // above the final total; fall back to the last weighted item.
        last
    }

    /// Returns the item domain in construction order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns the weights in construction order.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}
