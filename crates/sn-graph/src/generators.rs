//! Procedural topology generators.
//!
//! Convenience producers of valid networks for demos, benchmarks and tests.
//! Every generated spring joins two distinct existing nodes and fixed flags
//! are set before `build()` validates the result.

use sn_core::Real;

use crate::builder::NetworkBuilder;
use crate::error::TopologyResult;
use crate::graph::Network;

/// Parameters for a rectangular mass-spring sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    /// Node count along the vertical (Y) axis.
    pub rows: usize,
    /// Node count along X.
    pub cols: usize,
    pub spacing: Real,
    pub mass: Real,
    /// Stiffness of the horizontal and vertical edges.
    pub structural_stiffness: Real,
    /// Stiffness of the diagonal edges; 0 omits them.
    pub shear_stiffness: Real,
    /// Fix every node on the outer boundary.
    pub fix_boundary: bool,
}

impl Default for GridParams {
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

/// Generates a grid in the XY plane, top row at Y=0 growing downward.
///
/// Node `(r, c)` has index `r * cols + c`.
///
/// # Example
/// ```
/// use sn_graph::{GridParams, grid};
/// let network = grid(&GridParams { rows: 3, cols: 3, ..Default::default() }).unwrap();
/// assert_eq!(network.node_count(), 9);
/// assert_eq!(network.spring_count(), 12 + 8); // structural + shear
/// ```
pub fn grid(params: &GridParams) -> TopologyResult<Network> {
    let GridParams { rows, cols, .. } = *params;
    let mut builder = NetworkBuilder::with_capacity(rows * cols, rows * cols * 4);

    for r in 0..rows {
        for c in 0..cols {
            let position = [c as Real * params.spacing, -(r as Real) * params.spacing, 0.0];
            let id = builder.add_node(format!("n{r}_{c}"), params.mass, position);
            let on_boundary = r == 0 || c == 0 || r + 1 == rows || c + 1 == cols;
            if params.fix_boundary && on_boundary {
                builder.set_fixed(id, true);
            }
        }
    }

    let id = |r: usize, c: usize| sn_core::NodeId::from_index((r * cols + c) as u32);
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                builder.add_spring(id(r, c), id(r, c + 1), params.structural_stiffness);
            }
            if r + 1 < rows {
                builder.add_spring(id(r, c), id(r + 1, c), params.structural_stiffness);
            }
            if params.shear_stiffness > 0.0 && r + 1 < rows && c + 1 < cols {
                builder.add_spring(id(r, c), id(r + 1, c + 1), params.shear_stiffness);
                builder.add_spring(id(r, c + 1), id(r + 1, c), params.shear_stiffness);
            }
        }
    }

    builder.build()
}

/// Parameters for a straight chain of masses.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainParams {
    pub count: usize,
    pub spacing: Real,
    pub mass: Real,
    pub stiffness: Real,
    /// Position axis the chain extends along (downward).
    pub axis: usize,
    pub fix_first: bool,
    pub fix_last: bool,
}

impl Default for ChainParams {
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

/// Generates `count` nodes joined in sequence by `count - 1` springs.
pub fn chain(params: &ChainParams) -> TopologyResult<Network> {
    let mut builder = NetworkBuilder::with_capacity(params.count, params.count.saturating_sub(1));
    let axis = params.axis.min(2);

    let mut prev = None;
    for i in 0..params.count {
        let mut position = [0.0; 3];
        position[axis] = -(i as Real) * params.spacing;
        let id = builder.add_node(format!("n{i}"), params.mass, position);
        let is_end = (i == 0 && params.fix_first) || (i + 1 == params.count && params.fix_last);
        if is_end {
            builder.set_fixed(id, true);
        }
        if let Some(p) = prev {
            builder.add_spring(p, id, params.stiffness);
        }
        prev = Some(id);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts_and_boundary() {
        let params = GridParams {
            rows: 4,
            cols: 5,
            ..Default::default()
        };
        let network = grid(&params).unwrap();
        assert_eq!(network.node_count(), 20);
        // structural: 4*4 horizontal + 3*5 vertical, shear: 2 * 3*4
        assert_eq!(network.spring_count(), 16 + 15 + 24);
        // interior is (4-2)*(5-2) = 6 nodes
        assert_eq!(network.fixed_count(), 20 - 6);
    }

    #[test]
    fn grid_without_shear_or_fixing() {
        let params = GridParams {
            rows: 2,
            cols: 2,
            shear_stiffness: 0.0,
            fix_boundary: false,
            ..Default::default()
        };
        let network = grid(&params).unwrap();
        assert_eq!(network.spring_count(), 4);
        assert_eq!(network.fixed_count(), 0);
    }

    #[test]
    fn chain_layout() {
        let network = chain(&ChainParams::default()).unwrap();
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.spring_count(), 2);
        let nodes = network.nodes();
        assert!(nodes[0].fixed && !nodes[1].fixed && nodes[2].fixed);
        assert_eq!(nodes[2].position.y, -2.0);
    }

    #[test]
    fn chain_rejects_massless_free_nodes() {
        let params = ChainParams {
            mass: 0.0,
            ..Default::default()
        };
        assert!(chain(&params).is_err());
    }
}
