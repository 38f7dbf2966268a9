//! Meshsim Topology
//!
//! Topology descriptors for the mesh message-routing simulator and the
//! builder that turns operator input into a configuration payload.
//!
//! # Descriptor Format
//!
//! A topology is a YAML document listing every node and the neighbor ids it
//! declares:
//!
//! ```yaml
//! nodes:
//! - id: A
//!   neighbors: [B]
//! - id: B
//!   neighbors: []
//! ```
//!
//! Neighbor lists are per-node declarations and are never made symmetric.
//! Rendered edges are derived with a lexical rule: node `A` contributes an
//! edge to `B` only when `A < B`. See [`TopologyDescriptor::edges`].
//!
//! # Builder Paths
//!
//! - **Existing**: a file name held by the simulation engine.
//! - **Paste**: raw descriptor text, checked with a coarse declaration count.
//! - **Form**: one [`NodeSection`] per declared node, serialized to the same
//!   descriptor text as the paste path.

mod builder;
mod descriptor;
mod error;
mod form;
mod random;
mod simulation;

pub use builder::{existing_topology, form_descriptor, pasted_descriptor};
pub use descriptor::{count_declarations, Edge, NodeSpec, TopologyDescriptor};
pub use error::{Error, Result};
pub use form::{default_node_id, NeighborOption, NodeForm, NodeSection};
pub use random::random_topology;
pub use simulation::{SimulationConfig, TopologySource};

/// Maximum number of nodes a custom topology may declare.
pub const MAX_NODES: usize = 30;
