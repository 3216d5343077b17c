//! Flow identity resolution for the LCA flow pipeline.
//!
//! - **registry**: the [`FlowRegistry`] collaborator, an in-memory registry with
//!   keyword search and fuzzy suggestions, and its CSV reader
//! - **session**: a registry opened once per run
//! - **resolver**: batch resolution and identifier aggregation

pub mod error;
pub mod registry;
pub mod resolver;
pub mod session;

pub use error::{RegistryError, ResolveError, UnresolvedFlowError};
pub use registry::{
    FlowRegistry, InMemoryRegistry, RegistryEntry, RegistryMatch, read_registry,
};
pub use resolver::resolve;
pub use session::RegistrySession;
