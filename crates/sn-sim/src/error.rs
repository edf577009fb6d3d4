//! Error types for simulation operations.

use thiserror::Error;

use crate::stability::InstabilityWarning;

/// Errors encountered while stepping a network.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite value in {what}")]
    NonFinite { what: &'static str },

    /// Only raised when `SimOptions::reject_unstable` is set.
    #[error("Unstable step rejected: {0}")]
    Unstable(InstabilityWarning),

    #[error("Solver error: {0}")]
    Solver(#[from] sn_solver::SolverError),

    #[error("Topology error: {0}")]
    Topology(#[from] sn_graph::TopologyError),
}

impl SimError {
    /// Singular solves are recoverable by changing method or constraints.
    pub fn is_singular(&self) -> bool {
        matches!(self, SimError::Solver(e) if e.is_singular())
    }
}

pub type SimResult<T> = Result<T, SimError>;

impl From<sn_core::error::CoreError> for SimError {
    fn from(e: sn_core::error::CoreError) -> Self {
        match e {
            sn_core::CoreError::NonFinite { what, .. } => SimError::NonFinite { what },
            other => SimError::Solver(other.into()),
        }
    }
}
