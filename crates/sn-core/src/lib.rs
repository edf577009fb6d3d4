//! sn-core: stable foundation for springnet.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for nodes and springs)
//! - dim (degrees of freedom per node)
//! - error (shared error types)

pub mod dim;
pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use dim::Dim;
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
