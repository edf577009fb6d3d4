//! Solver selection and singular-system recovery.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use sn_core::Real;
use tracing::warn;

use crate::direct::solve_direct;
use crate::error::SolverResult;
use crate::gauss_seidel::{GaussSeidelConfig, free_residual_norm, gauss_seidel};

/// Interchangeable displacement solvers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LinearMethod {
    /// Gauss-Seidel with a fixed sweep budget.
    Iterative { sweeps: usize },
    /// Constraint elimination plus Gaussian elimination with partial pivoting.
    Direct,
}

impl Default for LinearMethod {
    fn default() -> Self {
        LinearMethod::Iterative { sweeps: 100 }
    }
}

/// What to do when the chosen method finds a singular system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SingularPolicy {
    /// Surface the error to the caller.
    #[default]
    Reject,
    /// Retry a failed direct solve with Gauss-Seidel, accepting that it may
    /// not converge within its budget.
    FallbackToIterative { sweeps: usize },
}

/// Displacement plus diagnostics.
#[derive(Clone, Debug)]
pub struct LinearSolution {
    pub u: DVector<Real>,
    /// Method that produced `u`.
    pub method: LinearMethod,
    /// Sweeps used (0 for a direct solve).
    pub sweeps: usize,
    /// `‖f - K·u‖` over free DOFs.
    pub residual_norm: Real,
    /// Whether a fallback replaced the requested method.
    pub fell_back: bool,
}

/// Solve `K·u = f` with fixed DOFs held at zero.
pub fn solve(
    k: &DMatrix<Real>,
    f: &DVector<Real>,
    fixed: &[bool],
    method: LinearMethod,
    warm_start: Option<&DVector<Real>>,
) -> SolverResult<LinearSolution> {
    match method {
        LinearMethod::Iterative { sweeps } => {
            let config = GaussSeidelConfig {
                max_sweeps: sweeps,
                ..Default::default()
            };
            let out = gauss_seidel(k, f, fixed, warm_start, &config)?;
            Ok(LinearSolution {
                u: out.u,
                method,
                sweeps: out.sweeps,
                residual_norm: out.residual_norm,
                fell_back: false,
            })
        }
        LinearMethod::Direct => {
            let u = solve_direct(k, f, fixed)?;
            let residual_norm = free_residual_norm(k, f, &u, fixed);
            Ok(LinearSolution {
                u,
                method,
                sweeps: 0,
                residual_norm,
                fell_back: false,
            })
        }
    }
}

/// Like [`solve`], recovering from a singular direct solve per `policy`.
pub fn solve_with_policy(
    k: &DMatrix<Real>,
    f: &DVector<Real>,
    fixed: &[bool],
    method: LinearMethod,
    policy: SingularPolicy,
    warm_start: Option<&DVector<Real>>,
) -> SolverResult<LinearSolution> {
    match (solve(k, f, fixed, method, warm_start), policy) {
        (Err(e), SingularPolicy::FallbackToIterative { sweeps })
            if e.is_singular() && method == LinearMethod::Direct =>
        {
            warn!(error = %e, sweeps, "direct solve singular, falling back to Gauss-Seidel");
            let mut solution = solve(
                k,
                f,
                fixed,
                LinearMethod::Iterative { sweeps },
                warm_start,
            )?;
            solution.fell_back = true;
            Ok(solution)
        }
        (result, _) => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;

    /// Two unconstrained nodes joined by one spring: nonzero diagonal, rigid
    /// translation mode.
    fn floating_pair() -> DMatrix<Real> {
        DMatrix::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0])
    }

    #[test]
    fn direct_and_iterative_agree_on_spd() {
        let k = DMatrix::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 2.0]);
        let f = DVector::from_vec(vec![1.0, 0.0]);
        let direct = solve(&k, &f, &[false, false], LinearMethod::Direct, None).unwrap();
        let iterative = solve(&k, &f, &[false, false], LinearMethod::default(), None).unwrap();
        assert!((direct.u - iterative.u).amax() < 1e-9);
        assert_eq!(direct.sweeps, 0);
        assert_eq!(iterative.sweeps, 100);
    }

    #[test]
    fn reject_policy_surfaces_singular() {
        let f = DVector::from_vec(vec![0.0, 1.0]);
        let err = solve_with_policy(
            &floating_pair(),
            &f,
            &[false, false],
            LinearMethod::Direct,
            SingularPolicy::Reject,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::Singular { .. }));
    }

    #[test]
    fn fallback_policy_retries_iteratively() {
        let f = DVector::from_vec(vec![0.0, 0.0]);
        let solution = solve_with_policy(
            &floating_pair(),
            &f,
            &[false, false],
            LinearMethod::Direct,
            SingularPolicy::FallbackToIterative { sweeps: 10 },
            None,
        )
        .unwrap();
        assert!(solution.fell_back);
        assert_eq!(solution.method, LinearMethod::Iterative { sweeps: 10 });
        assert!(solution.u.iter().all(|v| v.is_finite()));
    }
}
