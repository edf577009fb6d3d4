//! Scenario validation logic.

use crate::schema::{NetworkDef, NodeDef, Scenario, SpringDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > crate::schema::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    validate_network(&scenario.network)?;

    scenario
        .simulation
        .validate()
        .map_err(|e| invalid("simulation", e, "rejected by the simulator"))
}

fn validate_network(network: &NetworkDef) -> Result<(), ValidationError> {
    match network {
        NetworkDef::Grid(grid) => {
            if grid.rows == 0 || grid.cols == 0 {
                return Err(invalid(
                    "grid.rows x grid.cols",
                    format!("{}x{}", grid.rows, grid.cols),
                    "grid needs at least one row and column",
                ));
            }
            check_positive("grid.spacing", grid.spacing)?;
            check_positive("grid.mass", grid.mass)?;
            check_stiffness("grid.structural_stiffness", grid.structural_stiffness)?;
            check_stiffness("grid.shear_stiffness", grid.shear_stiffness)
        }
        NetworkDef::Chain(chain) => {
            if chain.count < 2 {
                return Err(invalid("chain.count", chain.count, "chain needs two nodes"));
            }
            if chain.axis > 2 {
                return Err(invalid("chain.axis", chain.axis, "axis must be 0, 1 or 2"));
            }
            check_positive("chain.spacing", chain.spacing)?;
            check_positive("chain.mass", chain.mass)?;
            check_stiffness("chain.stiffness", chain.stiffness)
        }
        NetworkDef::Explicit { nodes, springs } => validate_explicit(nodes, springs),
    }
}

fn validate_explicit(nodes: &[NodeDef], springs: &[SpringDef]) -> Result<(), ValidationError> {
    if nodes.is_empty() {
        return Err(invalid("nodes", 0, "network has no nodes"));
    }

    let mut node_ids = HashSet::new();
    for node in nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
                context: "nodes".to_string(),
            });
        }
        if node.position.iter().chain(&node.velocity).any(|v| !v.is_finite()) {
            return Err(invalid(
                &format!("node {} position/velocity", node.id),
                "non-finite",
                "coordinates must be finite",
            ));
        }
        if !node.fixed {
            check_positive(&format!("node {} mass", node.id), node.mass)?;
        }
    }

    for (i, spring) in springs.iter().enumerate() {
        for end in [&spring.from_node_id, &spring.to_node_id] {
            if !node_ids.contains(end.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: end.clone(),
                    context: format!("spring {i}"),
                });
            }
        }
        if spring.from_node_id == spring.to_node_id {
            return Err(invalid(
                &format!("spring {i}"),
                &spring.from_node_id,
                "spring connects a node to itself",
            ));
        }
        check_stiffness(&format!("spring {i} stiffness"), spring.stiffness)?;
    }

    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn check_stiffness(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative"))
    }
}
