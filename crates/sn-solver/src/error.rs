//! Error types for solver operations.

use sn_core::error::CoreError;
use thiserror::Error;

/// Errors that can occur during assembly or a linear solve.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    /// Near-zero pivot or diagonal: a rigid or under-constrained mode.
    #[error("Singular system at DOF {dof} (pivot {pivot:e}); add constraints or use the iterative solver")]
    Singular { dof: usize, pivot: f64 },

    #[error("Non-finite value in {what}")]
    NonFinite { what: &'static str },

    #[error("Topology error: {0}")]
    Topology(#[from] sn_graph::TopologyError),
}

impl SolverError {
    pub fn is_singular(&self) -> bool {
        matches!(self, SolverError::Singular { .. })
    }
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<CoreError> for SolverError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => SolverError::NonFinite { what },
            other => SolverError::ProblemSetup {
                what: other.to_string(),
            },
        }
    }
}
