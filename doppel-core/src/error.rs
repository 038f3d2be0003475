//! Error types for the Doppel core library.
//!
//! Construction-time failures from the collaborating modules are aggregated
//! into [`DoppelError`] so callers wiring a whole pipeline handle one enum.
//! Soft sampling failures are not errors; they surface as `Option`s and
//! retry counters in the synthesis loop.

use std::fmt;

use thiserror::Error;

use crate::{budget::BudgetError, graph::GraphError, proposer::DistributionError};

/// Top-level error produced while assembling or mutating a graph pipeline.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DoppelError {
    /// A categorical distribution was malformed.
    #[error(transparent)]
    Distribution(#[from] DistributionError),
    /// A degree budget could not be built.
    #[error(transparent)]
    Budget(#[from] BudgetError),
    /// A graph mutation referenced a vertex or edge that does not exist.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Stable codes describing [`DoppelError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum DoppelErrorCode {
    /// A categorical distribution was malformed.
    Distribution,
    /// A degree budget could not be built.
    Budget,
    /// A graph mutation referenced a vertex or edge that does not exist.
    Graph,
}

impl DoppelErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Distribution => "DOPPEL_DISTRIBUTION",
            Self::Budget => "DOPPEL_BUDGET",
            Self::Graph => "DOPPEL_GRAPH",
        }
    }
}

impl fmt::Display for DoppelErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DoppelError {
    /// Retrieve the stable [`DoppelErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> DoppelErrorCode {
        match self {
            Self::Distribution(_) => DoppelErrorCode::Distribution,
            Self::Budget(_) => DoppelErrorCode::Budget,
            Self::Graph(_) => DoppelErrorCode::Graph,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DoppelError>;
