//! Direct solve: constraint elimination, then Gaussian elimination with
//! partial pivoting and back-substitution.

use nalgebra::{DMatrix, DVector};
use sn_core::{Real, SINGULAR_EPS, ensure_all_finite, max_abs};
use tracing::debug;

use crate::constraints::eliminate_fixed_dofs;
use crate::error::{SolverError, SolverResult};

/// Solve `K·u = f` with fixed DOFs forced to exactly zero.
///
/// Inputs are not modified.
pub fn solve_direct(
    k: &DMatrix<Real>,
    f: &DVector<Real>,
    fixed: &[bool],
) -> SolverResult<DVector<Real>> {
    let mut k = k.clone();
    let mut f = f.clone();
    eliminate_fixed_dofs(&mut k, &mut f, fixed)?;
    let mut u = gaussian_elimination(k, f)?;
    // Back-substitution already yields 0/1 here; pin it against -0.0.
    for (i, _) in fixed.iter().enumerate().filter(|(_, fixed)| **fixed) {
        u[i] = 0.0;
    }
    Ok(u)
}

/// Gaussian elimination with partial pivoting.
///
/// At each column the row with the largest absolute value in that column is
/// swapped into pivot position. A pivot below `SINGULAR_EPS` relative to the
/// largest entry of its own column in the input `k` (or an exactly zero
/// pivot) is reported as `SolverError::Singular` instead of producing NaN or
/// infinity. Scaling per column keeps the unit rows left by constraint
/// elimination valid next to arbitrarily stiff springs.
pub fn gaussian_elimination(
    mut k: DMatrix<Real>,
    mut f: DVector<Real>,
) -> SolverResult<DVector<Real>> {
    let n = k.nrows();
    if k.ncols() != n || f.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "direct solve shape mismatch: K {}x{}, f {}",
                k.nrows(),
                k.ncols(),
                f.len()
            ),
        });
    }

    // Column-major storage: column j is the j-th run of n entries.
    let col_tol: Vec<Real> = k
        .as_slice()
        .chunks(n.max(1))
        .map(|column| SINGULAR_EPS * max_abs(column))
        .collect();

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = k[(col, col)].abs();
        for row in (col + 1)..n {
            let candidate = k[(row, col)].abs();
            if candidate > pivot_abs {
                pivot_row = row;
                pivot_abs = candidate;
            }
        }

        if !(pivot_abs > 0.0 && pivot_abs >= col_tol[col]) {
            return Err(SolverError::Singular {
                dof: col,
                pivot: k[(pivot_row, col)],
            });
        }

        if pivot_row != col {
            k.swap_rows(col, pivot_row);
            f.swap_rows(col, pivot_row);
        }

        let pivot = k[(col, col)];
        for row in (col + 1)..n {
            let factor = k[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                k[(row, j)] -= factor * k[(col, j)];
            }
            f[row] -= factor * f[col];
        }
    }

    let mut u = DVector::zeros(n);
    for row in (0..n).rev() {
        let mut sum = f[row];
        for j in (row + 1)..n {
            sum -= k[(row, j)] * u[j];
        }
        u[row] = sum / k[(row, row)];
    }

    ensure_all_finite(u.as_slice(), "direct displacement")?;

    debug!(dofs = n, "direct solve finished");
    Ok(u)
}
