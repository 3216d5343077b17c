//! Data model for the LCA flow pipeline.
//!
//! - **record**: the four stage records (raw, converted, normalized, finalized)
//! - **ids**: registry identifiers
//! - **enums**: flow role, direction and aggregation policy
//! - **functional_unit**: the normalization basis
//! - **config**: static pipeline configuration
//! - **units**: canonical unit spellings

pub mod config;
pub mod enums;
pub mod error;
pub mod functional_unit;
pub mod ids;
pub mod record;
pub mod units;

pub use config::{MergeAmount, MergeRemoval, MergeRule, PipelineConfig, RoleUnits, TargetUnitPolicy};
pub use enums::{AggregationPolicy, Direction, FlowRole};
pub use error::{ModelError, Result};
pub use functional_unit::FunctionalUnit;
pub use ids::FlowIdentifier;
pub use units::{RATE_SUFFIX, canonical_unit};
pub use record::{
    ConvertedFlowRecord, FinalizedFlowRecord, FlowRecord, NormalizedFlowRecord, RawFlowRecord,
};
