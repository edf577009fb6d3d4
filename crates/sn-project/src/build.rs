//! Conversion from scenario definitions to runtime objects.

use std::collections::HashMap;

use sn_graph::{ChainParams, GridParams, Network, NetworkBuilder, chain, grid};
use sn_sim::Simulation;

use crate::schema::{NetworkDef, Scenario};
use crate::validate::ValidationError;
use crate::{ProjectError, ProjectResult};

pub fn build_network(def: &NetworkDef) -> ProjectResult<Network> {
    let network = match def {
        NetworkDef::Grid(g) => grid(&GridParams {
            rows: g.rows,
            cols: g.cols,
            spacing: g.spacing,
            mass: g.mass,
            structural_stiffness: g.structural_stiffness,
            shear_stiffness: g.shear_stiffness,
            fix_boundary: g.fix_boundary,
        })?,
        NetworkDef::Chain(c) => chain(&ChainParams {
            count: c.count,
            spacing: c.spacing,
            mass: c.mass,
            stiffness: c.stiffness,
            axis: c.axis,
            fix_first: c.fix_first,
            fix_last: c.fix_last,
        })?,
        NetworkDef::Explicit { nodes, springs } => {
            let mut builder = NetworkBuilder::with_capacity(nodes.len(), springs.len());
            let mut ids = HashMap::with_capacity(nodes.len());
            for node in nodes {
                let id = if node.fixed {
                    builder.add_fixed_node(node.id.clone(), node.position)
                } else {
                    builder.add_node(node.id.clone(), node.mass, node.position)
                };
                builder.set_velocity(id, node.velocity);
                ids.insert(node.id.as_str(), id);
            }
            for spring in springs {
                let lookup = |name: &String| {
                    ids.get(name.as_str())
                        .copied()
                        .ok_or_else(|| ValidationError::MissingReference {
                            id: name.clone(),
                            context: "spring endpoint".to_string(),
                        })
                };
                let from = lookup(&spring.from_node_id)?;
                let to = lookup(&spring.to_node_id)?;
                builder.add_spring(from, to, spring.stiffness);
            }
            builder.build()?
        }
    };
    Ok(network)
}

/// Build the network and a ready-to-step simulation.
pub fn build_simulation(scenario: &Scenario) -> ProjectResult<Simulation> {
    let network = build_network(&scenario.network)?;
    Simulation::new(network, scenario.simulation.clone()).map_err(ProjectError::from)
}
