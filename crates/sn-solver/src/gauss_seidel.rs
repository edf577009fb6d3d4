//! Gauss-Seidel relaxation.

use nalgebra::{DMatrix, DVector};
use sn_core::{Real, SINGULAR_EPS, ensure_all_finite};
use tracing::debug;

use crate::error::{SolverError, SolverResult};

/// Gauss-Seidel configuration.
#[derive(Clone, Copy, Debug)]
pub struct GaussSeidelConfig {
    /// Fixed sweep budget. This is a cap, not a convergence guarantee.
    pub max_sweeps: usize,
    /// Free-DOF diagonals with smaller magnitude are reported as singular.
    pub singular_eps: Real,
}

impl Default for GaussSeidelConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 100,
            singular_eps: SINGULAR_EPS,
        }
    }
}

/// Result of a relaxation run.
#[derive(Clone, Debug)]
pub struct GaussSeidelOutcome {
    pub u: DVector<Real>,
    pub sweeps: usize,
    /// `‖f - K·u‖` over free DOFs after the last sweep.
    pub residual_norm: Real,
}

/// Relax `K·u = f` with fixed DOFs pinned to zero.
///
/// Each sweep updates free DOFs in place, in index order, using the newest
/// values of earlier DOFs. `warm_start` seeds `u`; fixed entries are reset to
/// zero on every sweep regardless.
pub fn gauss_seidel(
    k: &DMatrix<Real>,
    f: &DVector<Real>,
    fixed: &[bool],
    warm_start: Option<&DVector<Real>>,
    config: &GaussSeidelConfig,
) -> SolverResult<GaussSeidelOutcome> {
    let n = k.nrows();
    if k.ncols() != n || f.len() != n || fixed.len() != n {
        return Err(SolverError::ProblemSetup {
            what: "Gauss-Seidel shape mismatch".to_string(),
        });
    }

    for i in (0..n).filter(|&i| !fixed[i]) {
        let diag = k[(i, i)];
        if diag.abs() < config.singular_eps {
            return Err(SolverError::Singular { dof: i, pivot: diag });
        }
    }

    let mut u = match warm_start {
        Some(u0) if u0.len() == n => u0.clone(),
        _ => DVector::zeros(n),
    };

    for _ in 0..config.max_sweeps {
        for i in 0..n {
            if fixed[i] {
                u[i] = 0.0;
                continue;
            }
            let mut sum = f[i];
            for j in 0..n {
                if j != i {
                    sum -= k[(i, j)] * u[j];
                }
            }
            u[i] = sum / k[(i, i)];
        }
    }
    // A zero budget still honors the constraint.
    for i in (0..n).filter(|&i| fixed[i]) {
        u[i] = 0.0;
    }

    ensure_all_finite(u.as_slice(), "Gauss-Seidel displacement")?;

    let residual_norm = free_residual_norm(k, f, &u, fixed);
    debug!(
        sweeps = config.max_sweeps,
        residual_norm, "Gauss-Seidel finished"
    );

    Ok(GaussSeidelOutcome {
        u,
        sweeps: config.max_sweeps,
        residual_norm,
    })
}

/// `‖f - K·u‖` restricted to free rows.
pub(crate) fn free_residual_norm(
    k: &DMatrix<Real>,
    f: &DVector<Real>,
    u: &DVector<Real>,
    fixed: &[bool],
) -> Real {
    let ku = k * u;
    (0..f.len())
        .filter(|&i| !fixed[i])
        .map(|i| {
            let r = f[i] - ku[i];
            r * r
        })
        .sum::<Real>()
        .sqrt()
}
