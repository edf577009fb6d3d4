//! sn-graph: topology layer for springnet.
//!
//! Provides:
//! - Node and spring data (`Node`, `Spring`, `Network`)
//! - Incremental network builder with validation
//! - Degree-of-freedom indexing for the assembler and solvers
//! - Topology generators (grid, chain)
//!
//! # Example
//!
//! ```
//! use sn_graph::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new();
//! let anchor = builder.add_fixed_node("anchor", [0.0, 0.0, 0.0]);
//! let bob = builder.add_node("bob", 1.0, [0.0, -1.0, 0.0]);
//! builder.add_spring(anchor, bob, 10.0);
//! let network = builder.build().unwrap();
//!
//! assert_eq!(network.node_count(), 2);
//! assert_eq!(network.spring_count(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod generators;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

pub use builder::NetworkBuilder;
pub use error::{TopologyError, TopologyResult};
pub use generators::{ChainParams, GridParams, chain, grid};
pub use graph::{Network, Node, Spring};
pub use indexing::DofMap;
