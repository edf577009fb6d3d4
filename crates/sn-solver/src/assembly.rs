//! Global stiffness assembly.
//!
//! Builds the incidence matrix `A` (springs × DOFs), the diagonal stiffness
//! `C` and `K = AᵗCA`. Row `i` of `A` holds spring `i`'s coefficients:
//!
//! - scalar mode (1 DOF per node): `-1` at the start DOF, `+1` at the end DOF,
//!   geometry ignored
//! - vector mode (2 or 3 DOFs per node): `-c_k` / `+c_k` where `c` is the unit
//!   vector from start to end at the supplied positions
//!
//! `K` is symmetric positive semi-definite for any `C >= 0`. In vector mode
//! the direction cosines depend on geometry, so `K` must be re-assembled
//! when positions change materially.

use nalgebra::{DMatrix, DVector, Vector3};
use sn_core::{Dim, Real};
use sn_graph::Network;
use tracing::debug;

use crate::error::{SolverError, SolverResult};

/// Spring length below which the direction is treated as undefined.
const DEGENERATE_LENGTH: Real = 1e-12;

/// Closed set of assembly behaviors, chosen by DOF dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssemblyMode {
    Scalar,
    Vector,
}

impl AssemblyMode {
    pub fn for_dim(dim: Dim) -> Self {
        if dim.is_scalar() {
            AssemblyMode::Scalar
        } else {
            AssemblyMode::Vector
        }
    }
}

/// Assembled system matrices for one geometry.
#[derive(Debug, Clone)]
pub struct SystemMatrices {
    pub dim: Dim,
    /// `A`, springs × DOFs.
    pub incidence: DMatrix<Real>,
    /// Diagonal of `C`, one stiffness per spring.
    pub spring_stiffness: DVector<Real>,
    /// `K = AᵗCA`, DOFs × DOFs.
    pub stiffness: DMatrix<Real>,
}

impl SystemMatrices {
    pub fn dof_count(&self) -> usize {
        self.stiffness.nrows()
    }

    pub fn spring_count(&self) -> usize {
        self.incidence.nrows()
    }

    /// `C` as a dense diagonal matrix.
    pub fn stiffness_diagonal(&self) -> DMatrix<Real> {
        DMatrix::from_diagonal(&self.spring_stiffness)
    }

    /// Largest `|K[i,j] - K[j,i]|`.
    pub fn max_asymmetry(&self) -> Real {
        let k = &self.stiffness;
        let n = k.nrows();
        let mut worst: Real = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                worst = worst.max((k[(i, j)] - k[(j, i)]).abs());
            }
        }
        worst
    }

    /// DOFs whose diagonal is effectively zero (unconnected or rigid).
    pub fn zero_diagonal_dofs(&self) -> Vec<usize> {
        (0..self.dof_count())
            .filter(|&i| self.stiffness[(i, i)].abs() < sn_core::SINGULAR_EPS)
            .collect()
    }

    /// Elastic force `K·u`.
    pub fn elastic_force(&self, u: &DVector<Real>) -> DVector<Real> {
        &self.stiffness * u
    }
}

/// Assemble at the network's initial positions.
pub fn assemble(network: &Network, dim: Dim) -> SolverResult<SystemMatrices> {
    let positions = network.positions();
    assemble_with_positions(network, &positions, dim)
}

/// Assemble at the given node positions (one per node).
pub fn assemble_with_positions(
    network: &Network,
    positions: &[Vector3<Real>],
    dim: Dim,
) -> SolverResult<SystemMatrices> {
    let n = network.node_count();
    if positions.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "positions length mismatch: {} != {}",
                positions.len(),
                n
            ),
        });
    }

    let d = dim.count();
    let m = network.spring_count();
    let mode = AssemblyMode::for_dim(dim);

    let mut incidence = DMatrix::zeros(m, n * d);
    let mut spring_stiffness = DVector::zeros(m);

    for (row, spring) in network.springs().iter().enumerate() {
        let start = spring.start.idx();
        let end = spring.end.idx();
        spring_stiffness[row] = spring.stiffness;

        match mode {
            AssemblyMode::Scalar => {
                incidence[(row, start)] = -1.0;
                incidence[(row, end)] = 1.0;
            }
            AssemblyMode::Vector => {
                let c = direction(&positions[start], &positions[end]);
                for k in 0..d {
                    incidence[(row, start * d + k)] = -c[k];
                    incidence[(row, end * d + k)] = c[k];
                }
            }
        }
    }

    // K = Aᵗ (C A), then mirror the upper triangle so K is exactly symmetric.
    let mut ca = incidence.clone();
    for (row, mut r) in ca.row_iter_mut().enumerate() {
        r *= spring_stiffness[row];
    }
    let mut stiffness = incidence.tr_mul(&ca);
    let size = stiffness.nrows();
    for i in 0..size {
        for j in (i + 1)..size {
            let avg = 0.5 * (stiffness[(i, j)] + stiffness[(j, i)]);
            stiffness[(i, j)] = avg;
            stiffness[(j, i)] = avg;
        }
    }

    debug!(
        springs = m,
        dofs = n * d,
        ?mode,
        "assembled stiffness matrix"
    );

    Ok(SystemMatrices {
        dim,
        incidence,
        spring_stiffness,
        stiffness,
    })
}

/// Unit vector from `start` to `end`; zero for a degenerate edge.
fn direction(start: &Vector3<Real>, end: &Vector3<Real>) -> Vector3<Real> {
    let delta = end - start;
    let length = delta.norm();
    if length < DEGENERATE_LENGTH {
        Vector3::zeros()
    } else {
        delta / length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sn_graph::NetworkBuilder;

    fn two_node(k: Real, end: [Real; 3]) -> Network {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("a", 1.0, [0.0; 3]);
        let b = builder.add_node("b", 1.0, end);
        builder.add_spring(a, b, k);
        builder.build().unwrap()
    }

    #[test]
    fn scalar_two_node_stiffness() {
        let network = two_node(7.0, [1.0, 0.0, 0.0]);
        let sys = assemble(&network, Dim::One).unwrap();
        assert_eq!(sys.incidence.shape(), (1, 2));
        assert_eq!(sys.incidence[(0, 0)], -1.0);
        assert_eq!(sys.incidence[(0, 1)], 1.0);
        let expected = DMatrix::from_row_slice(2, 2, &[7.0, -7.0, -7.0, 7.0]);
        assert_eq!(sys.stiffness, expected);
    }

    #[test]
    fn scalar_mode_ignores_geometry() {
        let network = two_node(3.0, [0.0, -5.0, 2.0]);
        let sys = assemble(&network, Dim::One).unwrap();
        assert_eq!(sys.stiffness[(0, 0)], 3.0);
        assert_eq!(sys.stiffness[(0, 1)], -3.0);
    }

    #[test]
    fn vector_mode_uses_direction_cosines() {
        let network = two_node(2.0, [3.0, 4.0, 0.0]);
        let sys = assemble(&network, Dim::Two).unwrap();
        assert_eq!(sys.incidence.shape(), (1, 4));
        assert!((sys.incidence[(0, 0)] + 0.6).abs() < 1e-12);
        assert!((sys.incidence[(0, 1)] + 0.8).abs() < 1e-12);
        assert!((sys.incidence[(0, 2)] - 0.6).abs() < 1e-12);
        assert!((sys.incidence[(0, 3)] - 0.8).abs() < 1e-12);
        // K[0,0] = k * cx^2
        assert!((sys.stiffness[(0, 0)] - 2.0 * 0.36).abs() < 1e-12);
        assert!((sys.stiffness[(0, 3)] + 2.0 * 0.48).abs() < 1e-12);
    }

    #[test]
    fn degenerate_edge_contributes_nothing() {
        let network = two_node(10.0, [0.0; 3]);
        let sys = assemble(&network, Dim::Three).unwrap();
        assert!(sys.stiffness.iter().all(|v| *v == 0.0));
        assert!(sys.stiffness.iter().all(|v| v.is_finite()));
        assert_eq!(sys.zero_diagonal_dofs().len(), 6);
    }

    #[test]
    fn positions_length_mismatch_is_rejected() {
        let network = two_node(1.0, [1.0, 0.0, 0.0]);
        let err = assemble_with_positions(&network, &[Vector3::zeros()], Dim::Two).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }

    #[test]
    fn stiffness_diagonal_matches_springs() {
        let network = two_node(4.5, [1.0, 0.0, 0.0]);
        let sys = assemble(&network, Dim::Two).unwrap();
        assert_eq!(sys.stiffness_diagonal(), DMatrix::from_element(1, 1, 4.5));
        assert_eq!(sys.spring_count(), 1);
        assert_eq!(sys.dof_count(), 4);
        assert_eq!(sys.max_asymmetry(), 0.0);
    }
}
