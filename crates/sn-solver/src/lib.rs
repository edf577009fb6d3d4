//! Linear stiffness assembly and displacement solvers for spring networks.
//!
//! The global stiffness operator is assembled as `K = AᵗCA` from the
//! network's incidence matrix `A` and diagonal spring stiffness `C`. The
//! displacement `u` solving `K·u = f` with fixed DOFs held at zero is then
//! found either by Gauss-Seidel relaxation or by direct elimination with
//! partial pivoting.

pub mod assembly;
pub mod constraints;
pub mod direct;
pub mod error;
pub mod gauss_seidel;
pub mod solve;

pub use assembly::{AssemblyMode, SystemMatrices, assemble, assemble_with_positions};
pub use constraints::eliminate_fixed_dofs;
pub use direct::{gaussian_elimination, solve_direct};
pub use error::{SolverError, SolverResult};
pub use gauss_seidel::{GaussSeidelConfig, GaussSeidelOutcome, gauss_seidel};
pub use solve::{LinearMethod, LinearSolution, SingularPolicy, solve, solve_with_policy};
