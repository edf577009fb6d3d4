//! Fixed-frame runner and result recording.

use serde::Serialize;
use sn_core::Real;

use crate::driver::Simulation;
use crate::error::{SimError, SimResult};
use crate::stability::InstabilityWarning;
use crate::state::Snapshot;

/// Options for offline runs.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Elapsed time handed to each `step` call (seconds).
    pub frame_dt: Real,
    /// Final simulation time (seconds).
    pub t_end: Real,
    /// Maximum number of frames (safety limit)
    pub max_frames: usize,
    /// Record every N-th frame (decimation)
    pub record_every: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frame_dt: 1.0 / 60.0,
            t_end: 1.0,
            max_frames: 100_000,
            record_every: 1,
        }
    }
}

/// Recorded frames of a run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<Real>,
    pub snapshots: Vec<Snapshot>,
    pub warnings: Vec<InstabilityWarning>,
}

/// Step `sim` in frames of `frame_dt` until `t_end`, recording snapshots.
///
/// The initial snapshot is always recorded, and so is the final one.
pub fn run_sim(sim: &mut Simulation, opts: &RunOptions) -> SimResult<SimRecord> {
    if !(opts.frame_dt.is_finite() && opts.frame_dt > 0.0) {
        return Err(SimError::InvalidArg {
            what: "frame_dt must be positive",
        });
    }
    if !(opts.t_end.is_finite() && opts.t_end >= 0.0) {
        return Err(SimError::InvalidArg {
            what: "t_end must be non-negative",
        });
    }
    if opts.max_frames == 0 {
        return Err(SimError::InvalidArg {
            what: "max_frames must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let t_start = sim.time();
    let mut record = SimRecord::default();
    record.t.push(t_start);
    record.snapshots.push(sim.snapshot().clone());

    let mut frame = 0;
    let mut last_recorded = true;
    // Half a frame of slack keeps accumulated round-off from adding a frame.
    while sim.time() - t_start + 0.5 * opts.frame_dt < opts.t_end && frame < opts.max_frames {
        let report = sim.step(opts.frame_dt)?;
        frame += 1;
        if let Some(warning) = report.instability {
            record.warnings.push(warning);
        }

        last_recorded = frame % opts.record_every == 0;
        if last_recorded {
            record.t.push(sim.time());
            record.snapshots.push(sim.snapshot().clone());
        }
    }

    if !last_recorded {
        record.t.push(sim.time());
        record.snapshots.push(sim.snapshot().clone());
    }

    Ok(record)
}
