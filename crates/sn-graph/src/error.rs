//! Topology construction errors.

use sn_core::{CoreError, NodeId, SpringId};

pub type TopologyResult<T> = Result<T, TopologyError>;

/// Configuration errors rejected before the first assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// A spring connects a node to itself.
    SelfLoop { spring: SpringId, node: NodeId },

    /// A spring endpoint refers to a node that doesn't exist.
    InvalidNodeRef {
        spring: SpringId,
        node: NodeId,
        node_count: usize,
    },

    /// A free node has zero, negative or non-finite mass.
    NonPositiveMass { node: NodeId, mass: f64 },

    /// A spring has negative or non-finite stiffness.
    NegativeStiffness { spring: SpringId, stiffness: f64 },

    /// A node position or velocity component is NaN or infinite.
    NonFiniteAttribute { node: NodeId, what: &'static str },

    /// Adjacency list is inconsistent with the spring endpoints.
    InconsistentAdjacency { spring: SpringId, node: NodeId },

    /// ID not found.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::SelfLoop { spring, node } => {
                write!(f, "Spring {} connects node {} to itself", spring, node)
            }
            TopologyError::InvalidNodeRef {
                spring,
                node,
                node_count,
            } => {
                write!(
                    f,
                    "Spring {} refers to non-existent node {} (node count {})",
                    spring, node, node_count
                )
            }
            TopologyError::NonPositiveMass { node, mass } => {
                write!(f, "Free node {} has non-positive mass {}", node, mass)
            }
            TopologyError::NegativeStiffness { spring, stiffness } => {
                write!(f, "Spring {} has invalid stiffness {}", spring, stiffness)
            }
            TopologyError::NonFiniteAttribute { node, what } => {
                write!(f, "Node {} has a non-finite {}", node, what)
            }
            TopologyError::InconsistentAdjacency { spring, node } => {
                write!(
                    f,
                    "Spring {} in node {}'s adjacency list but doesn't touch that node",
                    spring, node
                )
            }
            TopologyError::IdNotFound { what } => {
                write!(f, "{} not found", what)
            }
        }
    }
}

impl std::error::Error for TopologyError {}

impl From<TopologyError> for CoreError {
    fn from(err: TopologyError) -> Self {
        CoreError::Invariant {
            what: err.to_string(),
        }
    }
}
