//! Per-sub-step integrators.

use nalgebra::{DVector, Vector3};
use sn_core::{Real, ensure_all_finite};
use sn_graph::{DofMap, Network};
use sn_solver::{LinearMethod, SingularPolicy, SystemMatrices, solve_with_policy};

use crate::error::SimResult;
use crate::loads::gravity_load;
use crate::options::{FixedDofPolicy, SimOptions, StepModel};
use crate::state::SimState;

/// Diagnostics from one sub-step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubstepInfo {
    /// Linear solve residual, when a solve happened.
    pub residual_norm: Option<Real>,
    /// Whether the solve fell back to Gauss-Seidel.
    pub fell_back: bool,
}

/// Trait for sub-step integrators.
pub trait Integrator {
    fn model(&self) -> StepModel;

    /// Advance `state` by one sub-step of size `dt`.
    ///
    /// `state` is a tick-local working copy; on error the caller discards it.
    fn advance(
        &self,
        system: &SystemMatrices,
        dofs: &DofMap,
        state: &mut SimState,
        dt: Real,
    ) -> SimResult<SubstepInfo>;
}

/// Re-solved force balance, solution treated as a velocity.
#[derive(Clone, Debug)]
pub struct QuasiStatic {
    pub gravity: Real,
    pub method: LinearMethod,
    pub singular_policy: SingularPolicy,
}

impl Integrator for QuasiStatic {
    fn model(&self) -> StepModel {
        StepModel::QuasiStatic
    }

    fn advance(
        &self,
        system: &SystemMatrices,
        dofs: &DofMap,
        state: &mut SimState,
        dt: Real,
    ) -> SimResult<SubstepInfo> {
        let f = gravity_load(dofs, self.gravity);
        let solution = solve_with_policy(
            &system.stiffness,
            &f,
            dofs.fixed_mask(),
            self.method,
            self.singular_policy,
            Some(&state.u),
        )?;

        for (dof, &v) in solution.u.iter().enumerate() {
            let (node, axis) = dofs.node_axis(dof);
            state.positions[node][axis] += v * dt;
            state.velocities[node][axis] = v;
        }
        state.u_prev = std::mem::replace(&mut state.u, solution.u);

        Ok(SubstepInfo {
            residual_norm: Some(solution.residual_norm),
            fell_back: solution.fell_back,
        })
    }
}

/// Explicit central difference for `M·u'' + α·M·u' + K·u = f`.
///
/// Conditionally stable: `dt` must stay below `2/ω_max` of `M⁻¹K`.
#[derive(Clone, Debug)]
pub struct CentralDifference {
    pub gravity: Real,
    pub damping: Real,
    pub fixed_dofs: FixedDofPolicy,
    /// Positions at which `u = 0`.
    pub rest_positions: Vec<Vector3<Real>>,
}

impl Integrator for CentralDifference {
    fn model(&self) -> StepModel {
        StepModel::Dynamic
    }

    fn advance(
        &self,
        system: &SystemMatrices,
        dofs: &DofMap,
        state: &mut SimState,
        dt: Real,
    ) -> SimResult<SubstepInfo> {
        let f = gravity_load(dofs, self.gravity);
        let elastic = system.elastic_force(&state.u);
        let mass = dofs.lumped_mass();
        let dt2 = dt * dt;

        let next = DVector::from_fn(dofs.dof_count(), |i, _| {
            if dofs.is_fixed(i) {
                return match self.fixed_dofs {
                    FixedDofPolicy::Zero => 0.0,
                    FixedDofPolicy::HoldLast => state.u[i],
                };
            }
            let damping = self.damping * mass[i] * (state.u[i] - state.u_prev[i]) / dt;
            (f[i] * dt2 - damping * dt - elastic[i] * dt2) / mass[i] + 2.0 * state.u[i]
                - state.u_prev[i]
        });

        ensure_all_finite(next.as_slice(), "central-difference displacement")?;

        state.u_prev = std::mem::replace(&mut state.u, next);

        for dof in 0..dofs.dof_count() {
            let (node, axis) = dofs.node_axis(dof);
            state.positions[node][axis] = self.rest_positions[node][axis] + state.u[dof];
            state.velocities[node][axis] = (state.u[dof] - state.u_prev[dof]) / dt;
        }

        Ok(SubstepInfo::default())
    }
}

/// The integrator selected by `SimOptions::model`.
#[derive(Clone, Debug)]
pub enum Stepper {
    QuasiStatic(QuasiStatic),
    Dynamic(CentralDifference),
}

impl Stepper {
    pub fn from_options(options: &SimOptions, network: &Network) -> Self {
        match options.model {
            StepModel::QuasiStatic => Stepper::QuasiStatic(QuasiStatic {
                gravity: options.gravity,
                method: options.solver,
                singular_policy: options.singular_policy,
            }),
            StepModel::Dynamic => Stepper::Dynamic(CentralDifference {
                gravity: options.gravity,
                damping: options.damping,
                fixed_dofs: options.fixed_dofs,
                rest_positions: network.positions(),
            }),
        }
    }
}

impl Integrator for Stepper {
    fn model(&self) -> StepModel {
        match self {
            Stepper::QuasiStatic(s) => s.model(),
            Stepper::Dynamic(s) => s.model(),
        }
    }

    fn advance(
        &self,
        system: &SystemMatrices,
        dofs: &DofMap,
        state: &mut SimState,
        dt: Real,
    ) -> SimResult<SubstepInfo> {
        match self {
            Stepper::QuasiStatic(s) => s.advance(system, dofs, state, dt),
            Stepper::Dynamic(s) => s.advance(system, dofs, state, dt),
        }
    }
}
