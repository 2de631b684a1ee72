//! Knowledge-graph store access.
//!
//! [`GraphStore`] hands out [`GraphSession`]s, the unit of work given to a
//! concurrent task. [`Neo4jStore`] is the production backend; results cross
//! the boundary as [`GraphNode`] values rather than driver types.

pub mod error;
pub mod node;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::GraphError;
pub use node::{CategoryMatch, GraphNode};
pub use store::{GraphSession, GraphStore, Neo4jSession, Neo4jStore};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockGraphSession, MockGraphStore};
