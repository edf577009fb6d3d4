//! Scenario file schema definitions.

use serde::{Deserialize, Serialize};
use sn_core::Real;
use sn_sim::SimOptions;

/// Current scenario file version.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub network: NetworkDef,
    #[serde(default)]
    pub simulation: SimOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum NetworkDef {
    Grid(GridDef),
    Chain(ChainDef),
    Explicit {
        nodes: Vec<NodeDef>,
        #[serde(default)]
        springs: Vec<SpringDef>,
    },
}

/// Rectangular sheet in the XY plane, hanging along -Y.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridDef {
    pub rows: usize,
    pub cols: usize,
    pub spacing: Real,
    pub mass: Real,
    pub structural_stiffness: Real,
    /// Zero disables the diagonal springs.
    pub shear_stiffness: Real,
    pub fix_boundary: bool,
}

impl Default for GridDef {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            spacing: 1.0,
            mass: 1.0,
            structural_stiffness: 100.0,
            shear_stiffness: 50.0,
            fix_boundary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChainDef {
    pub count: usize,
    pub spacing: Real,
    pub mass: Real,
    pub stiffness: Real,
    pub axis: usize,
    pub fix_first: bool,
    pub fix_last: bool,
}

impl Default for ChainDef {
    fn default() -> Self {
        Self {
            count: 3,
            spacing: 1.0,
            mass: 1.0,
            stiffness: 100.0,
            axis: 1,
            fix_first: true,
            fix_last: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    /// Ignored for fixed nodes.
    #[serde(default)]
    pub mass: Real,
    pub position: [Real; 3],
    #[serde(default)]
    pub velocity: [Real; 3],
    #[serde(default)]
    pub fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpringDef {
    pub from_node_id: String,
    pub to_node_id: String,
    pub stiffness: Real,
}
