//! Time stepping for spring networks.
//!
//! Provides:
//! - Quasi-static stepping (re-solve force balance every tick, solution used as a velocity)
//! - Explicit central-difference dynamics with lumped mass and mass-proportional damping
//! - A driver that subdivides arbitrary elapsed intervals into stable sub-steps
//! - Damped critical time step estimation and instability warnings
//! - Snapshots published only after a tick completes

pub mod driver;
pub mod error;
pub mod integrator;
pub mod loads;
pub mod options;
pub mod sim;
pub mod stability;
pub mod state;

pub use driver::{Simulation, StepReport};
pub use error::{SimError, SimResult};
pub use integrator::{CentralDifference, Integrator, QuasiStatic, Stepper, SubstepInfo};
pub use loads::gravity_load;
pub use options::{FixedDofPolicy, ReassemblyPolicy, SimOptions, StepModel};
pub use sim::{RunOptions, SimRecord, run_sim};
pub use stability::{InstabilityWarning, critical_time_step, substep_count};
pub use state::{NodeView, SimState, Snapshot};
