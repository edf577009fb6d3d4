//! Committed simulation state and the read-only snapshot published to hosts.

use nalgebra::{DVector, Vector3};
use serde::Serialize;
use sn_core::{NodeId, Real};
use sn_graph::{DofMap, Network};

/// Everything a tick mutates.
///
/// The driver clones this at the start of a tick, steps the clone, and swaps
/// it in only if the whole tick succeeds.
#[derive(Debug, Clone)]
pub struct SimState {
    pub u: DVector<Real>,
    /// Previous displacement (dynamic model only).
    pub u_prev: DVector<Real>,
    pub positions: Vec<Vector3<Real>>,
    pub velocities: Vec<Vector3<Real>>,
    pub time: Real,
    pub tick: u64,
}

impl SimState {
    /// Rest state at the network's initial geometry.
    ///
    /// `u` and `u_prev` start at zero, so the central-difference recurrence
    /// starts from rest: a node's initial `velocity` appears in the first
    /// snapshot but does not drive the motion.
    pub fn from_network(network: &Network, dofs: &DofMap) -> Self {
        Self {
            u: DVector::zeros(dofs.dof_count()),
            u_prev: DVector::zeros(dofs.dof_count()),
            positions: network.positions(),
            velocities: network.velocities(),
            time: 0.0,
            tick: 0,
        }
    }

    /// Per-node view of a DOF vector, padded to three components.
    pub fn node_vector(v: &DVector<Real>, dofs: &DofMap, node_idx: usize) -> Vector3<Real> {
        let mut out = Vector3::zeros();
        for axis in 0..dofs.dim().count() {
            out[axis] = v[dofs.dof(node_idx, axis)];
        }
        out
    }
}

/// Read-only per-node data for renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub position: Vector3<Real>,
    pub velocity: Vector3<Real>,
    /// The node's slice of `u`: displacement from rest in the dynamic model,
    /// the force-balance solution in the quasi-static model.
    pub displacement: Vector3<Real>,
    pub fixed: bool,
}

/// Immutable post-tick picture of the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time: Real,
    pub nodes: Vec<NodeView>,
}

impl Snapshot {
    pub fn capture(network: &Network, dofs: &DofMap, state: &SimState) -> Self {
        let nodes = network
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| NodeView {
                id: node.id,
                position: state.positions[i],
                velocity: state.velocities[i],
                displacement: SimState::node_vector(&state.u, dofs, i),
                fixed: node.fixed,
            })
            .collect();
        Self {
            tick: state.tick,
            time: state.time,
            nodes,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeView> {
        self.nodes.get(id.idx())
    }

    /// Largest displacement magnitude over all nodes.
    pub fn max_displacement(&self) -> Real {
        self.nodes
            .iter()
            .map(|n| n.displacement.norm())
            .fold(0.0, Real::max)
    }
}
