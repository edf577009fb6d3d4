//! Core network data structures.

use nalgebra::Vector3;
use sn_core::{NodeId, Real, SpringId};

/// A point mass.
///
/// Positions and velocities are always stored with three components; lower
/// dimensional modes only read the leading axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub mass: Real,
    pub position: Vector3<Real>,
    pub velocity: Vector3<Real>,
    /// Fixed nodes never accumulate displacement.
    pub fixed: bool,
}

/// A linear axial spring between two distinct nodes.
///
/// Physically undirected. The assembler treats `start -> end` as the
/// positive tension direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub id: SpringId,
    pub start: NodeId,
    pub end: NodeId,
    pub stiffness: Real,
}

impl Spring {
    /// Endpoints as `[start, end]`.
    pub fn endpoints(&self) -> [NodeId; 2] {
        [self.start, self.end]
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.start {
            Some(self.end)
        } else if node == self.end {
            Some(self.start)
        } else {
            None
        }
    }
}

/// A validated, immutable collection of nodes and springs.
///
/// Topology is fixed once built. The network stores the initial node state;
/// simulations copy it into their own buffers.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) springs: Vec<Spring>,

    /// Node i's incident springs are in node_springs[node_spring_offsets[i]..node_spring_offsets[i+1]].
    pub(crate) node_spring_offsets: Vec<usize>,

    /// Flat list of spring IDs incident to nodes, sorted per node for determinism.
    pub(crate) node_springs: Vec<SpringId>,
}

impl Network {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())
    }

    /// Get a spring by ID (returns None if ID out of bounds).
    pub fn spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id.idx())
    }

    /// Springs incident to a node.
    pub fn node_springs(&self, node_id: NodeId) -> &[SpringId] {
        let idx = node_id.idx();
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_spring_offsets[idx];
        let end = self.node_spring_offsets[idx + 1];
        &self.node_springs[start..end]
    }

    /// Nodes connected to `node_id` by at least one spring.
    pub fn neighbors(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node_springs(node_id)
            .iter()
            .filter_map(move |&s| self.spring(s).and_then(|spring| spring.other(node_id)))
    }

    pub fn fixed_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.fixed).count()
    }

    /// Initial positions, in node order.
    pub fn positions(&self) -> Vec<Vector3<Real>> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    /// Initial velocities, in node order.
    pub fn velocities(&self) -> Vec<Vector3<Real>> {
        self.nodes.iter().map(|n| n.velocity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sn_core::Id;

    #[test]
    fn spring_other_endpoint() {
        let spring = Spring {
            id: Id::from_index(0),
            start: Id::from_index(3),
            end: Id::from_index(7),
            stiffness: 1.0,
        };
        assert_eq!(spring.other(Id::from_index(3)), Some(Id::from_index(7)));
        assert_eq!(spring.other(Id::from_index(7)), Some(Id::from_index(3)));
        assert_eq!(spring.other(Id::from_index(1)), None);
        assert_eq!(spring.endpoints(), [Id::from_index(3), Id::from_index(7)]);
    }
}
