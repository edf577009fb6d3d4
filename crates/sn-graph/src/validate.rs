//! Network validation logic.

use std::collections::HashSet;

use sn_core::SpringId;

use crate::error::{TopologyError, TopologyResult};
use crate::graph::{Node, Spring};

/// Free nodes need strictly positive mass; all state must be finite.
pub(crate) fn validate_nodes(nodes: &[Node]) -> TopologyResult<()> {
    for node in nodes {
        if !node.fixed && !(node.mass.is_finite() && node.mass > 0.0) {
            return Err(TopologyError::NonPositiveMass {
                node: node.id,
                mass: node.mass,
            });
        }
        if node.position.iter().any(|v| !v.is_finite()) {
            return Err(TopologyError::NonFiniteAttribute {
                node: node.id,
                what: "position",
            });
        }
        if node.velocity.iter().any(|v| !v.is_finite()) {
            return Err(TopologyError::NonFiniteAttribute {
                node: node.id,
                what: "velocity",
            });
        }
    }
    Ok(())
}

/// Every spring must join two distinct, existing nodes with stiffness >= 0.
pub(crate) fn validate_springs(nodes: &[Node], springs: &[Spring]) -> TopologyResult<()> {
    for spring in springs {
        for node in spring.endpoints() {
            if node.idx() >= nodes.len() {
                return Err(TopologyError::InvalidNodeRef {
                    spring: spring.id,
                    node,
                    node_count: nodes.len(),
                });
            }
        }

        if spring.start == spring.end {
            return Err(TopologyError::SelfLoop {
                spring: spring.id,
                node: spring.start,
            });
        }

        if !(spring.stiffness.is_finite() && spring.stiffness >= 0.0) {
            return Err(TopologyError::NegativeStiffness {
                spring: spring.id,
                stiffness: spring.stiffness,
            });
        }
    }
    Ok(())
}

/// Validate adjacency lists for consistency.
pub(crate) fn validate_adjacency(
    nodes: &[Node],
    springs: &[Spring],
    node_spring_offsets: &[usize],
    node_springs: &[SpringId],
) -> TopologyResult<()> {
    if node_spring_offsets.len() != nodes.len() + 1 {
        return Err(TopologyError::IdNotFound {
            what: "adjacency offsets",
        });
    }

    let mut seen: HashSet<(SpringId, usize)> = HashSet::new();
    for (idx, node) in nodes.iter().enumerate() {
        let start = node_spring_offsets[idx];
        let end = node_spring_offsets[idx + 1];

        for &spring_id in &node_springs[start..end] {
            let spring = springs
                .get(spring_id.idx())
                .ok_or(TopologyError::InconsistentAdjacency {
                    spring: spring_id,
                    node: node.id,
                })?;
            if spring.other(node.id).is_none() || !seen.insert((spring_id, idx)) {
                return Err(TopologyError::InconsistentAdjacency {
                    spring: spring_id,
                    node: node.id,
                });
            }
        }
    }

    // Each spring appears once per endpoint.
    for spring in springs {
        for node in spring.endpoints() {
            if !seen.contains(&(spring.id, node.idx())) {
                return Err(TopologyError::InconsistentAdjacency {
                    spring: spring.id,
                    node,
                });
            }
        }
    }

    Ok(())
}
