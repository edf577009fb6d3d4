//! Simulation configuration.

use serde::{Deserialize, Serialize};
use sn_core::{Dim, Real, ensure_finite};
use sn_solver::{LinearMethod, SingularPolicy};

use crate::error::{SimError, SimResult};

/// How the solved vector drives node motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepModel {
    /// Solve `K·u = f` every tick and treat `u` as a velocity:
    /// `position += u·Δt`, `velocity = u`. No memory of prior displacement.
    QuasiStatic,
    /// Central-difference integration of `M·u'' + α·M·u' + K·u = f`, with `u`
    /// the displacement from rest.
    #[default]
    Dynamic,
}

/// How fixed DOFs are treated by the dynamic integrator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedDofPolicy {
    /// Fixed DOFs always read displacement 0.
    #[default]
    Zero,
    /// Fixed DOFs keep their last value.
    HoldLast,
}

/// When the stiffness matrix is rebuilt from current geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReassemblyPolicy {
    /// Only at construction and on explicit `build_system_matrices` calls.
    #[default]
    Once,
    /// Before every tick (vector mode only; scalar mode ignores geometry).
    EveryTick,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Nominal sub-step; the effective sub-step never exceeds it.
    pub dt: Real,
    /// Mass-proportional damping coefficient α.
    pub damping: Real,
    /// Signed acceleration along the vertical axis.
    pub gravity: Real,
    pub dim: Dim,
    pub model: StepModel,
    pub solver: LinearMethod,
    pub singular_policy: SingularPolicy,
    pub fixed_dofs: FixedDofPolicy,
    pub reassembly: ReassemblyPolicy,
    /// Upper bound on sub-steps per tick.
    pub max_substeps: usize,
    /// Turn instability warnings into errors and discard the tick.
    pub reject_unstable: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            damping: 0.0,
            gravity: -9.81,
            dim: Dim::default(),
            model: StepModel::default(),
            solver: LinearMethod::default(),
            singular_policy: SingularPolicy::default(),
            fixed_dofs: FixedDofPolicy::default(),
            reassembly: ReassemblyPolicy::default(),
            max_substeps: 10_000,
            reject_unstable: false,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "damping must be non-negative",
            });
        }
        ensure_finite(self.gravity, "gravity")?;
        if self.max_substeps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_substeps must be positive",
            });
        }
        if let LinearMethod::Iterative { sweeps: 0 } = self.solver {
            return Err(SimError::InvalidArg {
                what: "iterative solver needs at least one sweep",
            });
        }
        Ok(())
    }
}
