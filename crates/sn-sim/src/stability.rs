//! Stability control for explicit integration.
//!
//! Central difference on `M·u'' + K·u = f` is stable only while
//! `dt < 2/ω_max`, with `ω_max²` the largest eigenvalue of `M⁻¹K` over free
//! DOFs (tighter with damping). The driver keeps every sub-step at or below
//! the nominal step and flags ticks whose sub-step still reaches the limit,
//! since those are the ticks whose displacement grows without bound.

use std::fmt;

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::Serialize;
use sn_core::{Real, SINGULAR_EPS, max_abs};
use sn_graph::DofMap;
use sn_solver::SystemMatrices;

use crate::error::{SimError, SimResult};

/// Number of equal sub-steps so that `elapsed / n <= nominal_dt`.
pub fn substep_count(elapsed: Real, nominal_dt: Real, max_substeps: usize) -> SimResult<usize> {
    if !elapsed.is_finite() || elapsed < 0.0 {
        return Err(SimError::InvalidArg {
            what: "elapsed must be finite and non-negative",
        });
    }
    if elapsed == 0.0 {
        return Ok(0);
    }
    // Tolerate round-off so an exact multiple of dt doesn't gain a step.
    let n = (elapsed / nominal_dt * (1.0 - 1e-12)).ceil().max(1.0);
    if n > max_substeps as Real {
        return Err(SimError::InvalidArg {
            what: "elapsed interval needs more sub-steps than max_substeps allows",
        });
    }
    Ok(n as usize)
}

/// Largest stable central-difference step for `M·u'' + α·M·u' + K·u = f`.
///
/// Each mode of the recurrence is stable while `ω²·dt² + 2·α·dt < 4`, which
/// gives `dt_crit = 4 / (α + sqrt(α² + 4·ω_max²))`. With `α = 0` this is the
/// familiar `2/ω_max`; with no stiffness it reduces to `2/α`.
///
/// `None` when no free DOF has elastic stiffness and there is no damping
/// (any step is stable).
pub fn critical_time_step(system: &SystemMatrices, dofs: &DofMap, damping: Real) -> Option<Real> {
    let free: Vec<usize> = dofs.free_dofs().collect();
    if free.is_empty() {
        return None;
    }

    // M^{-1/2} K M^{-1/2} shares eigenvalues with M⁻¹K and stays symmetric.
    let mass = dofs.lumped_mass();
    let inv_sqrt = DVector::from_iterator(free.len(), free.iter().map(|&i| mass[i].sqrt().recip()));
    let scaled = DMatrix::from_fn(free.len(), free.len(), |a, b| {
        system.stiffness[(free[a], free[b])] * inv_sqrt[a] * inv_sqrt[b]
    });

    let mut omega_sq_max = SymmetricEigen::new(scaled)
        .eigenvalues
        .iter()
        .fold(0.0, |acc: Real, v| acc.max(*v));
    if omega_sq_max <= SINGULAR_EPS {
        omega_sq_max = 0.0;
    }
    let denom = damping + (damping * damping + 4.0 * omega_sq_max).sqrt();
    if denom <= 0.0 {
        return None;
    }
    Some(4.0 / denom)
}

/// Non-fatal signal that the step is too large for the stiffness/mass ratio.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstabilityWarning {
    pub tick: u64,
    pub substep_dt: Real,
    pub critical_dt: Option<Real>,
    pub start_displacement: Real,
    pub peak_displacement: Real,
    /// Recommended nominal step: half the current one.
    pub suggested_dt: Real,
}

impl fmt::Display for InstabilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {}: max |u| grew from {:.3e} to {:.3e} with sub-step {:.3e}",
            self.tick, self.start_displacement, self.peak_displacement, self.substep_dt
        )?;
        if let Some(crit) = self.critical_dt {
            write!(f, " (critical {:.3e})", crit)?;
        }
        write!(f, "; try dt = {:.3e}", self.suggested_dt)
    }
}

/// Tracks max |u| across the sub-steps of one tick, for reporting.
#[derive(Clone, Debug)]
pub(crate) struct GrowthTracker {
    start: Real,
    peak: Real,
}

impl GrowthTracker {
    pub(crate) fn new(u: &DVector<Real>) -> Self {
        let start = max_abs(u.as_slice());
        Self { start, peak: start }
    }

    pub(crate) fn observe(&mut self, u: &DVector<Real>) {
        self.peak = self.peak.max(max_abs(u.as_slice()));
    }

    pub(crate) fn start(&self) -> Real {
        self.start
    }

    pub(crate) fn peak(&self) -> Real {
        self.peak
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn substeps_cover_elapsed_without_exceeding_dt(
            elapsed in 1e-6_f64..2.0,
            dt in 1e-3_f64..0.1,
        ) {
            let n = substep_count(elapsed, dt, 1_000_000).unwrap();
            prop_assert!(n >= 1);
            prop_assert!(elapsed / n as Real <= dt * (1.0 + 1e-9));
            // one fewer sub-step would overshoot the nominal step
            if n > 1 {
                prop_assert!(elapsed / (n - 1) as Real > dt * (1.0 - 1e-9));
            }
        }
    }
}
