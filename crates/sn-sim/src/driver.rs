//! The tick driver: the surface hosts call once per frame.

use nalgebra::Vector3;
use sn_core::{NodeId, Real};
use sn_graph::{DofMap, Network};
use sn_solver::{SystemMatrices, assemble_with_positions};
use tracing::{debug, info, warn};

use crate::error::{SimError, SimResult};
use crate::integrator::{Integrator, Stepper};
use crate::options::{ReassemblyPolicy, SimOptions, StepModel};
use crate::stability::{GrowthTracker, InstabilityWarning, critical_time_step, substep_count};
use crate::state::{NodeView, SimState, Snapshot};

/// Outcome of one `step` call.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    pub tick: u64,
    pub elapsed: Real,
    pub substeps: usize,
    pub substep_dt: Real,
    pub max_displacement: Real,
    /// Worst linear-solve residual of the tick (quasi-static model).
    pub residual_norm: Option<Real>,
    pub fell_back: bool,
    pub instability: Option<InstabilityWarning>,
}

/// A spring network plus everything needed to advance it.
///
/// Topology is fixed at construction. `step` works on a private copy of the
/// state and publishes a new `Snapshot` only when the whole tick succeeds,
/// so readers never observe a partially stepped network.
#[derive(Debug, Clone)]
pub struct Simulation {
    network: Network,
    dofs: DofMap,
    options: SimOptions,
    system: SystemMatrices,
    critical_dt: Option<Real>,
    stepper: Stepper,
    state: SimState,
    snapshot: Snapshot,
}

impl Simulation {
    /// Validate options, assemble `K` at the initial geometry and publish the
    /// rest snapshot.
    pub fn new(network: Network, options: SimOptions) -> SimResult<Self> {
        options.validate()?;

        let dofs = DofMap::from_network(&network, options.dim);
        let state = SimState::from_network(&network, &dofs);
        let system = assemble_with_positions(&network, &state.positions, options.dim)?;
        let stepper = Stepper::from_options(&options, &network);
        let snapshot = Snapshot::capture(&network, &dofs, &state);

        let mut sim = Self {
            network,
            dofs,
            options,
            system,
            critical_dt: None,
            stepper,
            state,
            snapshot,
        };
        sim.refresh_critical_dt();

        info!(
            nodes = sim.network.node_count(),
            springs = sim.network.spring_count(),
            dofs = sim.dofs.dof_count(),
            dim = %sim.options.dim,
            model = ?sim.options.model,
            "simulation initialized"
        );
        Ok(sim)
    }

    /// Rebuild `A`, `C` and `K` at the current positions.
    ///
    /// Needed in vector mode whenever geometry has changed materially, since
    /// direction cosines depend on it.
    pub fn build_system_matrices(&mut self) -> SimResult<()> {
        self.system =
            assemble_with_positions(&self.network, &self.state.positions, self.options.dim)?;
        self.refresh_critical_dt();
        Ok(())
    }

    fn refresh_critical_dt(&mut self) {
        if self.options.model != StepModel::Dynamic {
            self.critical_dt = None;
            return;
        }
        self.critical_dt = critical_time_step(&self.system, &self.dofs, self.options.damping);
        if let Some(crit) = self.critical_dt {
            if self.options.dt >= crit {
                warn!(
                    dt = self.options.dt,
                    critical_dt = crit,
                    "nominal time step exceeds the central-difference stability limit"
                );
            }
        }
    }

    /// Advance by `elapsed` seconds.
    ///
    /// The dynamic model runs `⌈elapsed/dt⌉` equal sub-steps; the quasi-static
    /// model performs one solve over the whole interval. On error nothing is
    /// published and the previous snapshot stays current.
    pub fn step(&mut self, elapsed: Real) -> SimResult<StepReport> {
        let substeps = match self.stepper.model() {
            StepModel::Dynamic => {
                substep_count(elapsed, self.options.dt, self.options.max_substeps)?
            }
            StepModel::QuasiStatic => substep_count(elapsed, Real::INFINITY, 1)?,
        };

        if substeps == 0 {
            return Ok(StepReport {
                tick: self.state.tick,
                elapsed,
                substeps: 0,
                substep_dt: 0.0,
                max_displacement: self.snapshot.max_displacement(),
                residual_norm: None,
                fell_back: false,
                instability: None,
            });
        }

        let dt = elapsed / substeps as Real;
        let mut work = self.state.clone();

        let reassembled = if self.options.reassembly == ReassemblyPolicy::EveryTick
            && !self.options.dim.is_scalar()
        {
            Some(assemble_with_positions(
                &self.network,
                &work.positions,
                self.options.dim,
            )?)
        } else {
            None
        };
        let system = reassembled.as_ref().unwrap_or(&self.system);

        let dynamic = self.stepper.model() == StepModel::Dynamic;
        let critical_dt = match &reassembled {
            Some(system) if dynamic => {
                critical_time_step(system, &self.dofs, self.options.damping)
            }
            _ => self.critical_dt,
        };

        let mut growth = GrowthTracker::new(&work.u);
        let mut residual_norm: Option<Real> = None;
        let mut fell_back = false;

        for _ in 0..substeps {
            let info = self.stepper.advance(system, &self.dofs, &mut work, dt)?;
            growth.observe(&work.u);
            if let Some(r) = info.residual_norm {
                residual_norm = Some(residual_norm.map_or(r, |prev| prev.max(r)));
            }
            fell_back |= info.fell_back;
        }

        work.time += elapsed;
        work.tick += 1;

        // Central difference grows without bound exactly when the sub-step
        // reaches the critical step of the matrix used for this tick.
        let unstable = dynamic && critical_dt.is_some_and(|crit| dt >= crit);
        let instability = unstable.then(|| InstabilityWarning {
            tick: work.tick,
            substep_dt: dt,
            critical_dt,
            start_displacement: growth.start(),
            peak_displacement: growth.peak(),
            suggested_dt: self.options.dt * 0.5,
        });

        if let Some(warning) = &instability {
            warn!(%warning, "instability detected");
            if self.options.reject_unstable {
                return Err(SimError::Unstable(warning.clone()));
            }
        }

        // Commit: everything below is infallible.
        self.state = work;
        if let Some(system) = reassembled {
            self.system = system;
            self.critical_dt = critical_dt;
        }
        self.snapshot = Snapshot::capture(&self.network, &self.dofs, &self.state);

        debug!(
            tick = self.state.tick,
            substeps,
            dt,
            "tick complete"
        );

        Ok(StepReport {
            tick: self.state.tick,
            elapsed,
            substeps,
            substep_dt: dt,
            max_displacement: self.snapshot.max_displacement(),
            residual_norm,
            fell_back,
            instability,
        })
    }

    /// Last published snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeView> {
        self.snapshot.node(id)
    }

    pub fn position(&self, id: NodeId) -> Option<Vector3<Real>> {
        self.node(id).map(|n| n.position)
    }

    pub fn velocity(&self, id: NodeId) -> Option<Vector3<Real>> {
        self.node(id).map(|n| n.velocity)
    }

    pub fn displacement(&self, id: NodeId) -> Option<Vector3<Real>> {
        self.node(id).map(|n| n.displacement)
    }

    pub fn is_fixed(&self, id: NodeId) -> Option<bool> {
        self.node(id).map(|n| n.fixed)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn dofs(&self) -> &DofMap {
        &self.dofs
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    pub fn system(&self) -> &SystemMatrices {
        &self.system
    }

    /// Central-difference stability limit for the current `K` (dynamic model only).
    pub fn critical_dt(&self) -> Option<Real> {
        self.critical_dt
    }

    pub fn time(&self) -> Real {
        self.snapshot.time
    }

    pub fn tick(&self) -> u64 {
        self.snapshot.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sn_core::Dim;
    use sn_graph::NetworkBuilder;

    fn anchored_bob() -> (Network, NodeId) {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_fixed_node("anchor", [0.0; 3]);
        let b = builder.add_node("bob", 1.0, [0.0, -1.0, 0.0]);
        builder.add_spring(a, b, 100.0);
        (builder.build().unwrap(), b)
    }

    #[test]
    fn step_subdivides_elapsed_interval() {
        let (network, _) = anchored_bob();
        let options = SimOptions {
            dt: 0.01,
            dim: Dim::Two,
            ..Default::default()
        };
        let mut sim = Simulation::new(network, options).unwrap();
        let report = sim.step(0.035).unwrap();
        assert_eq!(report.substeps, 4);
        assert!(report.substep_dt <= 0.01);
        assert_eq!(sim.tick(), 1);
        assert!((sim.time() - 0.035).abs() < 1e-15);
    }

    #[test]
    fn zero_elapsed_is_a_no_op() {
        let (network, b) = anchored_bob();
        let mut sim = Simulation::new(network, SimOptions::default()).unwrap();
        let before = sim.snapshot().clone();
        let report = sim.step(0.0).unwrap();
        assert_eq!(report.substeps, 0);
        assert_eq!(sim.snapshot(), &before);
        assert_eq!(sim.displacement(b), Some(Vector3::zeros()));
    }

    #[test]
    fn rejected_step_publishes_nothing() {
        let (network, _) = anchored_bob();
        let options = SimOptions {
            dt: 0.5,
            dim: Dim::One,
            reject_unstable: true,
            ..Default::default()
        };
        let mut sim = Simulation::new(network, options).unwrap();
        let before = sim.snapshot().clone();
        let err = sim.step(0.5).unwrap_err();
        assert!(matches!(err, SimError::Unstable(_)));
        assert_eq!(sim.snapshot(), &before);
        assert_eq!(sim.tick(), 0);
    }

    #[test]
    fn quasi_static_uses_one_solve_per_tick() {
        let (network, b) = anchored_bob();
        let options = SimOptions {
            model: StepModel::QuasiStatic,
            dim: Dim::One,
            ..Default::default()
        };
        let mut sim = Simulation::new(network, options).unwrap();
        let report = sim.step(0.25).unwrap();
        assert_eq!(report.substeps, 1);
        assert_eq!(report.substep_dt, 0.25);
        assert!(report.residual_norm.is_some());
        assert!(sim.critical_dt().is_none());
        let u = sim.displacement(b).unwrap();
        assert!((u.x + 0.0981).abs() < 1e-9);
    }
}
