//! Degree-of-freedom indexing for the assembler and solvers.
//!
//! Node `i`, axis `k` maps to global DOF `i * d + k` where `d` is the
//! number of DOFs per node. The map also carries the per-DOF fixed mask and
//! lumped mass vector the solvers and integrators consume.

use sn_core::{Dim, NodeId, Real};

use crate::error::{TopologyError, TopologyResult};
use crate::graph::Network;

#[derive(Debug, Clone)]
pub struct DofMap {
    dim: Dim,
    node_count: usize,
    /// One entry per DOF.
    fixed: Vec<bool>,
    /// Node mass replicated across its DOFs.
    lumped_mass: Vec<Real>,
}

impl DofMap {
    pub fn from_network(network: &Network, dim: Dim) -> Self {
        let d = dim.count();
        let mut fixed = Vec::with_capacity(network.node_count() * d);
        let mut lumped_mass = Vec::with_capacity(network.node_count() * d);
        for node in network.nodes() {
            for _ in 0..d {
                fixed.push(node.fixed);
                lumped_mass.push(node.mass);
            }
        }
        Self {
            dim,
            node_count: network.node_count(),
            fixed,
            lumped_mass,
        }
    }

    pub fn dim(&self) -> Dim {
        self.dim
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Total number of DOFs (`node_count * d`).
    pub fn dof_count(&self) -> usize {
        self.fixed.len()
    }

    /// Global DOF for a node index and axis.
    pub fn dof(&self, node_idx: usize, axis: usize) -> usize {
        node_idx * self.dim.count() + axis
    }

    /// Global DOF for a node ID and axis, checking bounds.
    pub fn dof_of(&self, node: NodeId, axis: usize) -> TopologyResult<usize> {
        if node.idx() >= self.node_count || axis >= self.dim.count() {
            return Err(TopologyError::IdNotFound { what: "DOF" });
        }
        Ok(self.dof(node.idx(), axis))
    }

    /// Inverse of `dof`: `(node_idx, axis)`.
    pub fn node_axis(&self, dof: usize) -> (usize, usize) {
        let d = self.dim.count();
        (dof / d, dof % d)
    }

    pub fn is_fixed(&self, dof: usize) -> bool {
        self.fixed[dof]
    }

    pub fn fixed_mask(&self) -> &[bool] {
        &self.fixed
    }

    pub fn lumped_mass(&self) -> &[Real] {
        &self.lumped_mass
    }

    pub fn free_dofs(&self) -> impl Iterator<Item = usize> + '_ {
        self.fixed
            .iter()
            .enumerate()
            .filter(|(_, fixed)| !**fixed)
            .map(|(i, _)| i)
    }

    pub fn free_count(&self) -> usize {
        self.fixed.iter().filter(|f| !**f).count()
    }

    /// Whether `dof` lies on the axis gravity acts along.
    pub fn is_vertical(&self, dof: usize) -> bool {
        self.node_axis(dof).1 == self.dim.vertical_axis()
    }
}
