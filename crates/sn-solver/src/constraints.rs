//! Displacement boundary constraints.

use nalgebra::{DMatrix, DVector};
use sn_core::Real;

use crate::error::{SolverError, SolverResult};

/// Decouple every fixed DOF without resizing the system.
///
/// For fixed DOF `i`: row `i` and column `i` of `k` are zeroed, `k[i,i] = 1`
/// and `f[i] = 0`, so any solve yields `u[i] = 0` exactly.
pub fn eliminate_fixed_dofs(
    k: &mut DMatrix<Real>,
    f: &mut DVector<Real>,
    fixed: &[bool],
) -> SolverResult<()> {
    let n = k.nrows();
    if k.ncols() != n || f.len() != n || fixed.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "constraint shape mismatch: K {}x{}, f {}, mask {}",
                k.nrows(),
                k.ncols(),
                f.len(),
                fixed.len()
            ),
        });
    }

    for (i, _) in fixed.iter().enumerate().filter(|(_, fixed)| **fixed) {
        k.row_mut(i).fill(0.0);
        k.column_mut(i).fill(0.0);
        k[(i, i)] = 1.0;
        f[i] = 0.0;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_dof_is_decoupled() {
        let mut k = DMatrix::from_row_slice(
            3,
            3,
            &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0],
        );
        let mut f = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        eliminate_fixed_dofs(&mut k, &mut f, &[false, true, false]).unwrap();

        for j in 0..3 {
            let expected = if j == 1 { 1.0 } else { 0.0 };
            assert_eq!(k[(1, j)], expected);
            assert_eq!(k[(j, 1)], expected);
        }
        assert_eq!(f[1], 0.0);
        // Free block untouched.
        assert_eq!(k[(0, 0)], 2.0);
        assert_eq!(k[(2, 2)], 2.0);
        assert_eq!(f[2], 3.0);
    }

    #[test]
    fn mask_length_mismatch_is_rejected() {
        let mut k = DMatrix::identity(2, 2);
        let mut f = DVector::zeros(2);
        assert!(eliminate_fixed_dofs(&mut k, &mut f, &[true]).is_err());
    }
}
