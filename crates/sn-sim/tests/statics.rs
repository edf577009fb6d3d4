//! Quasi-static stepping and solver error handling.

use sn_core::{Dim, NodeId, Real, Tolerances, nearly_equal};
use sn_graph::{Network, NetworkBuilder};
use sn_sim::{SimError, SimOptions, Simulation, StepModel};
use sn_solver::{LinearMethod, SingularPolicy};

/// Fixed node at 0, free unit mass at 1, spring stiffness 10.
fn hanging_pair() -> (Network, NodeId) {
    let mut builder = NetworkBuilder::new();
    let top = builder.add_fixed_node("top", [0.0, 0.0, 0.0]);
    let bob = builder.add_node("bob", 1.0, [1.0, 0.0, 0.0]);
    builder.add_spring(top, bob, 10.0);
    (builder.build().expect("valid pair"), bob)
}

fn quasi_static(dim: Dim, solver: LinearMethod) -> SimOptions {
    SimOptions {
        dim,
        model: StepModel::QuasiStatic,
        solver,
        ..Default::default()
    }
}

#[test]
fn scalar_equilibrium_matches_closed_form() {
    let expected: Real = -9.81 / 10.0;
    for solver in [LinearMethod::Direct, LinearMethod::Iterative { sweeps: 100 }] {
        let (network, bob) = hanging_pair();
        let mut sim = Simulation::new(network, quasi_static(Dim::One, solver)).expect("simulation");
        let k11 = sim.system().stiffness[(1, 1)];
        assert_eq!(k11, 10.0);

        let report = sim.step(0.1).expect("step");
        let u = sim.displacement(bob).expect("bob").x;
        assert!(nearly_equal(u, expected, Tolerances::default()), "{solver:?}: {u}");
        assert!(report.residual_norm.expect("solve residual") < 1e-9);

        // solution is a velocity: position advances by u·Δt
        let position = sim.position(bob).expect("bob").x;
        assert!((position - (1.0 + expected * 0.1)).abs() < 1e-9);
        assert!((sim.velocity(bob).expect("bob").x - expected).abs() < 1e-9);
    }
}

#[test]
fn quasi_static_has_no_memory_of_displacement() {
    let (network, bob) = hanging_pair();
    let mut sim =
        Simulation::new(network, quasi_static(Dim::One, LinearMethod::Direct)).expect("simulation");
    for _ in 0..10 {
        sim.step(0.1).expect("step");
    }
    // same solve every tick, so the node drifts linearly
    let position = sim.position(bob).expect("bob").x;
    assert!((position - (1.0 - 0.981)).abs() < 1e-9);
    assert_eq!(sim.tick(), 10);
}

#[test]
fn very_stiff_springs_solve_directly() {
    // fixed-DOF unit rows must not look singular next to 1e13 entries
    let mut builder = NetworkBuilder::new();
    let top = builder.add_fixed_node("top", [0.0, 0.0, 0.0]);
    let mid = builder.add_node("mid", 1.0, [1.0, 0.0, 0.0]);
    let bottom = builder.add_fixed_node("bottom", [2.0, 0.0, 0.0]);
    builder.add_spring(top, mid, 1e13);
    builder.add_spring(mid, bottom, 1e13);
    let network = builder.build().expect("stiff chain");

    let mut sim =
        Simulation::new(network, quasi_static(Dim::One, LinearMethod::Direct)).expect("simulation");
    sim.step(0.1).expect("well-posed system");
    let u = sim.displacement(mid).expect("mid").x;
    let expected = -9.81 / 2e13;
    assert!(((u - expected) / expected).abs() < 1e-9, "{u}");
}

#[test]
fn singular_step_leaves_snapshot_untouched() {
    // vector mode: the horizontal spring gives the bob no vertical stiffness
    let (network, bob) = hanging_pair();
    let mut sim =
        Simulation::new(network, quasi_static(Dim::Two, LinearMethod::Direct)).expect("simulation");
    assert_eq!(sim.system().zero_diagonal_dofs(), vec![1, 3]);

    let before = sim.snapshot().clone();
    let err = sim.step(0.1).expect_err("singular system");
    assert!(err.is_singular());
    assert!(matches!(err, SimError::Solver(_)));
    assert_eq!(sim.snapshot(), &before);
    assert_eq!(sim.tick(), 0);
    assert_eq!(sim.position(bob), before.node(bob).map(|n| n.position));
}

#[test]
fn fallback_policy_is_reported() {
    let mut builder = NetworkBuilder::new();
    let a = builder.add_node("a", 1.0, [0.0, 0.0, 0.0]);
    let b = builder.add_node("b", 1.0, [1.0, 0.0, 0.0]);
    builder.add_spring(a, b, 10.0);
    let network = builder.build().expect("floating pair");

    let options = SimOptions {
        gravity: 0.0,
        singular_policy: SingularPolicy::FallbackToIterative { sweeps: 20 },
        ..quasi_static(Dim::One, LinearMethod::Direct)
    };
    let mut sim = Simulation::new(network, options).expect("simulation");
    let report = sim.step(0.1).expect("fallback recovers");
    assert!(report.fell_back);
    assert_eq!(sim.tick(), 1);
}

#[test]
fn invalid_options_abort_construction() {
    let (network, _) = hanging_pair();
    let options = SimOptions {
        dt: -1.0,
        ..Default::default()
    };
    assert!(matches!(
        Simulation::new(network, options),
        Err(SimError::InvalidArg { .. })
    ));
}
