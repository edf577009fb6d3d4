//! Incremental network builder.

use nalgebra::Vector3;
use sn_core::{NodeId, Real, SpringId};

use crate::error::TopologyResult;
use crate::graph::{Network, Node, Spring};
use crate::validate;

/// Builder for constructing a network incrementally.
///
/// Use `add_node` and `add_spring` to build up the network,
/// then call `build()` to validate and freeze it into an immutable `Network`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    springs: Vec<Spring>,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the builder for a known topology.
    pub fn with_capacity(nodes: usize, springs: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            springs: Vec::with_capacity(springs),
        }
    }

    /// Add a free node at rest and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>, mass: Real, position: [Real; 3]) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            name: name.into(),
            mass,
            position: Vector3::from(position),
            velocity: Vector3::zeros(),
            fixed: false,
        });
        id
    }

    /// Add a fixed node. Fixed nodes carry no mass requirement.
    pub fn add_fixed_node(&mut self, name: impl Into<String>, position: [Real; 3]) -> NodeId {
        let id = self.add_node(name, 0.0, position);
        self.set_fixed(id, true);
        id
    }

    /// Add a spring between two nodes and return its ID.
    ///
    /// Endpoints are checked in `build()`, not here.
    pub fn add_spring(&mut self, start: NodeId, end: NodeId, stiffness: Real) -> SpringId {
        let id = SpringId::from_index(self.springs.len() as u32);
        self.springs.push(Spring {
            id,
            start,
            end,
            stiffness,
        });
        id
    }

    pub fn set_fixed(&mut self, node_id: NodeId, fixed: bool) {
        if let Some(node) = self.nodes.get_mut(node_id.idx()) {
            node.fixed = fixed;
        }
    }

    pub fn set_mass(&mut self, node_id: NodeId, mass: Real) {
        if let Some(node) = self.nodes.get_mut(node_id.idx()) {
            node.mass = mass;
        }
    }

    pub fn set_velocity(&mut self, node_id: NodeId, velocity: [Real; 3]) {
        if let Some(node) = self.nodes.get_mut(node_id.idx()) {
            node.velocity = Vector3::from(velocity);
        }
    }

    /// Rename a node (useful for post-construction adjustments).
    pub fn rename_node(&mut self, node_id: NodeId, new_name: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(node_id.idx()) {
            node.name = new_name.into();
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Build and validate the network, returning an immutable `Network`.
    ///
    /// Rejects self-loops, dangling endpoints, non-positive free masses and
    /// negative stiffness before any matrix is assembled.
    pub fn build(self) -> TopologyResult<Network> {
        validate::validate_nodes(&self.nodes)?;
        validate::validate_springs(&self.nodes, &self.springs)?;

        let (node_spring_offsets, node_springs) =
            Self::build_adjacency(self.nodes.len(), &self.springs);

        validate::validate_adjacency(
            &self.nodes,
            &self.springs,
            &node_spring_offsets,
            &node_springs,
        )?;

        Ok(Network {
            nodes: self.nodes,
            springs: self.springs,
            node_spring_offsets,
            node_springs,
        })
    }

    /// Build compact adjacency lists: for each node, collect its incident springs.
    fn build_adjacency(node_count: usize, springs: &[Spring]) -> (Vec<usize>, Vec<SpringId>) {
        let mut per_node: Vec<Vec<SpringId>> = vec![Vec::new(); node_count];
        for spring in springs {
            per_node[spring.start.idx()].push(spring.id);
            per_node[spring.end.idx()].push(spring.id);
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut flat = Vec::with_capacity(springs.len() * 2);
        offsets.push(0);
        for mut list in per_node {
            list.sort_by_key(|s| s.index());
            flat.extend_from_slice(&list);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TopologyError;

    #[test]
    fn builder_basic() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node("N1", 1.0, [0.0; 3]);
        let n2 = builder.add_node("N2", 1.0, [1.0, 0.0, 0.0]);
        let s1 = builder.add_spring(n1, n2, 5.0);

        assert_eq!(n1.index(), 0);
        assert_eq!(n2.index(), 1);
        assert_eq!(s1.index(), 0);
        assert_eq!(builder.node_count(), 2);
        assert_eq!(builder.spring_count(), 1);
    }

    #[test]
    fn builder_rename_and_fix() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node("Old", 1.0, [0.0; 3]);
        builder.rename_node(n1, "New");
        builder.set_fixed(n1, true);
        assert_eq!(builder.nodes[0].name, "New");
        assert!(builder.nodes[0].fixed);
    }

    #[test]
    fn builder_build_adjacency() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_fixed_node("a", [0.0; 3]);
        let b = builder.add_node("b", 1.0, [1.0, 0.0, 0.0]);
        let c = builder.add_node("c", 1.0, [2.0, 0.0, 0.0]);
        builder.add_spring(a, b, 1.0);
        builder.add_spring(b, c, 1.0);

        let network = builder.build().unwrap();
        assert_eq!(network.node_springs(a).len(), 1);
        assert_eq!(network.node_springs(b).len(), 2);
        assert_eq!(network.node_springs(c).len(), 1);
        let neighbors: Vec<_> = network.neighbors(b).collect();
        assert_eq!(neighbors, vec![a, c]);
    }

    #[test]
    fn fixed_node_may_be_massless() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_fixed_node("a", [0.0; 3]);
        let b = builder.add_node("b", 2.0, [0.0, -1.0, 0.0]);
        builder.add_spring(a, b, 1.0);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn free_massless_node_is_rejected() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("a", 1.0, [0.0; 3]);
        builder.set_mass(a, 0.0);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, TopologyError::NonPositiveMass { .. }));
    }
}
