//! Simulation adapter for the LCA flow pipeline.
//!
//! - **model**: the [`FlowsheetModel`] collaborator trait and its port types
//! - **adapter**: build, solve and extract raw flow records
//! - **recorded**: a flowsheet replayed from a TOML recording

pub mod adapter;
pub mod error;
pub mod model;
pub mod recorded;

pub use adapter::{extract_raw_flows, run_simulation};
pub use error::{Result, SimulationError};
pub use model::{
    FlowsheetModel, Port, PortKind, PortRoleMap, PortStream, SimulationInputs, SolveReport,
    StreamContent,
};
pub use recorded::{RecordedFlowsheet, RecordedPort, Recording};
