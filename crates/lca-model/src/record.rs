//! Flow records produced by each pipeline stage.
//!
//! Every stage consumes an immutable slice of the previous stage's records and
//! returns a new `Vec`, so the raw, converted, normalized and finalized tables
//! of a run can all be kept side by side for auditing. Field names double as
//! the column names of the persisted CSV artifacts.

use serde::{Deserialize, Serialize};

use crate::enums::{Direction, FlowRole};
use crate::error::ModelError;
use crate::ids::FlowIdentifier;

/// Fields shared by the records of every stage table.
pub trait FlowRecord {
    fn flow_name(&self) -> &str;
    fn unit(&self) -> &str;

    /// Rejects a record with a blank flow name or unit.
    fn validate(&self) -> Result<(), ModelError> {
        if self.flow_name().trim().is_empty() {
            return Err(ModelError::EmptyFlowName);
        }
        if self.unit().trim().is_empty() {
            return Err(ModelError::EmptyUnit(self.flow_name().to_string()));
        }
        Ok(())
    }
}

macro_rules! impl_flow_record {
    ($($record:ty),+ $(,)?) => {
        $(
            impl FlowRecord for $record {
                fn flow_name(&self) -> &str {
                    &self.flow_name
                }

                fn unit(&self) -> &str {
                    &self.unit
                }
            }
        )+
    };
}

impl_flow_record!(
    RawFlowRecord,
    ConvertedFlowRecord,
    NormalizedFlowRecord,
    FinalizedFlowRecord,
);

/// A flow quantity as reported by the simulation, in simulation units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFlowRecord {
    pub flow_name: String,
    pub quantity: f64,
    pub unit: String,
    pub flow_role: FlowRole,
    /// Port or stream the flow was read from.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub direction: Direction,
}

impl RawFlowRecord {
    pub fn new(
        flow_name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        flow_role: FlowRole,
    ) -> Self {
        Self {
            flow_name: flow_name.into(),
            quantity,
            unit: unit.into(),
            flow_role,
            source: String::new(),
            direction: Direction::default(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// A raw record re-expressed in its LCA target unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedFlowRecord {
    pub flow_name: String,
    pub quantity: f64,
    pub unit: String,
    pub flow_role: FlowRole,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub direction: Direction,
}

impl ConvertedFlowRecord {
    /// Builds the converted counterpart of `raw` with a new quantity and unit.
    pub fn from_raw(raw: &RawFlowRecord, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            flow_name: raw.flow_name.clone(),
            quantity,
            unit: unit.into(),
            flow_role: raw.flow_role,
            source: raw.source.clone(),
            direction: raw.direction,
        }
    }
}

/// A converted record expressed per functional unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFlowRecord {
    pub flow_name: String,
    pub quantity: f64,
    pub unit: String,
    pub flow_role: FlowRole,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub direction: Direction,
    /// True for the flow the functional unit is declared on.
    #[serde(default)]
    pub reference_product: bool,
}

impl NormalizedFlowRecord {
    pub fn from_converted(converted: &ConvertedFlowRecord, quantity: f64) -> Self {
        Self {
            flow_name: converted.flow_name.clone(),
            quantity,
            unit: converted.unit.clone(),
            flow_role: converted.flow_role,
            source: converted.source.clone(),
            direction: converted.direction,
            reference_product: false,
        }
    }
}

/// A normalized record bound to its registry identity, ready for ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedFlowRecord {
    pub flow_name: String,
    pub quantity: f64,
    pub unit: String,
    pub flow_role: FlowRole,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub direction: Direction,
    pub identifier: FlowIdentifier,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub reference_product: bool,
}

impl FinalizedFlowRecord {
    pub fn from_normalized(
        normalized: &NormalizedFlowRecord,
        identifier: FlowIdentifier,
        category: Option<String>,
    ) -> Self {
        Self {
            flow_name: normalized.flow_name.clone(),
            quantity: normalized.quantity,
            unit: normalized.unit.clone(),
            flow_role: normalized.flow_role,
            source: normalized.source.clone(),
            direction: normalized.direction,
            identifier,
            category,
            reference_product: normalized.reference_product,
        }
    }
}
