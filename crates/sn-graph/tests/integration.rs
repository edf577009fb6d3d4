//! Integration tests for sn-graph.

use sn_core::{Dim, NodeId};
use sn_graph::{DofMap, GridParams, NetworkBuilder, TopologyError, grid};

#[test]
fn build_minimal_network() {
    // Build: anchor --k--> bob
    let mut builder = NetworkBuilder::new();
    let anchor = builder.add_fixed_node("anchor", [0.0, 0.0, 0.0]);
    let bob = builder.add_node("bob", 2.0, [0.0, -1.0, 0.0]);
    let s = builder.add_spring(anchor, bob, 40.0);

    let network = builder.build().unwrap();

    assert_eq!(network.node_count(), 2);
    assert_eq!(network.spring_count(), 1);
    assert_eq!(network.fixed_count(), 1);

    let spring = network.spring(s).unwrap();
    assert_eq!(spring.endpoints(), [anchor, bob]);
    assert_eq!(spring.other(anchor), Some(bob));
    assert_eq!(spring.stiffness, 40.0);

    assert_eq!(network.node_springs(anchor), &[s]);
    assert_eq!(network.node_springs(bob), &[s]);
    assert_eq!(network.node(bob).unwrap().name, "bob");
}

#[test]
fn adjacency_of_a_star() {
    // hub joined to three leaves
    let mut builder = NetworkBuilder::new();
    let hub = builder.add_node("hub", 1.0, [0.0; 3]);
    let leaves: Vec<NodeId> = (0..3)
        .map(|i| builder.add_fixed_node(format!("leaf{i}"), [i as f64 + 1.0, 0.0, 0.0]))
        .collect();
    for &leaf in &leaves {
        builder.add_spring(hub, leaf, 5.0);
    }
    let network = builder.build().unwrap();

    assert_eq!(network.node_springs(hub).len(), 3);
    let mut neighbors: Vec<NodeId> = network.neighbors(hub).collect();
    neighbors.sort();
    assert_eq!(neighbors, leaves);
    for &leaf in &leaves {
        assert_eq!(network.neighbors(leaf).collect::<Vec<_>>(), vec![hub]);
    }
}

#[test]
fn dof_map_over_a_grid() {
    let network = grid(&GridParams {
        rows: 3,
        cols: 3,
        ..Default::default()
    })
    .unwrap();

    let scalar = DofMap::from_network(&network, Dim::One);
    assert_eq!(scalar.dof_count(), 9);
    assert_eq!(scalar.free_count(), 1);

    let spatial = DofMap::from_network(&network, Dim::Three);
    assert_eq!(spatial.dof_count(), 27);
    assert_eq!(spatial.free_count(), 3);
    let centre = NodeId::from_index(4);
    assert_eq!(spatial.dof_of(centre, 2).unwrap(), 14);
    assert!(spatial.is_vertical(13));
    assert!(!spatial.is_fixed(12));
    assert!(matches!(
        spatial.dof_of(NodeId::from_index(9), 0),
        Err(TopologyError::IdNotFound { .. })
    ));
}

#[test]
fn invalid_networks_are_rejected() {
    let mut builder = NetworkBuilder::new();
    let a = builder.add_node("a", 1.0, [0.0; 3]);
    builder.add_spring(a, NodeId::from_index(5), 1.0);
    assert!(matches!(
        builder.build(),
        Err(TopologyError::InvalidNodeRef { node_count: 1, .. })
    ));

    let mut builder = NetworkBuilder::new();
    let a = builder.add_node("a", 0.0, [0.0; 3]);
    let b = builder.add_fixed_node("b", [1.0, 0.0, 0.0]);
    builder.add_spring(a, b, 1.0);
    assert!(matches!(
        builder.build(),
        Err(TopologyError::NonPositiveMass { .. })
    ));

    let mut builder = NetworkBuilder::new();
    let a = builder.add_node("a", 1.0, [f64::NAN, 0.0, 0.0]);
    let b = builder.add_fixed_node("b", [1.0, 0.0, 0.0]);
    builder.add_spring(a, b, 1.0);
    assert!(matches!(
        builder.build(),
        Err(TopologyError::NonFiniteAttribute { what: "position", .. })
    ));
}
