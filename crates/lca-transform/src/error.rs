//! Error types for conversion, normalization and merging.

use thiserror::Error;

use crate::units::UnitPair;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("no conversion factor for {pair}{}", describe_flow(.flow_name))]
    UnknownUnit {
        pair: UnitPair,
        flow_name: Option<String>,
    },

    #[error("invalid conversion factor {factor} for {pair}")]
    InvalidFactor { pair: UnitPair, factor: f64 },

    #[error("operating hours must be a positive number, got {0}")]
    InvalidOperatingHours(f64),

    #[error("quantity of flow '{flow_name}' is not a finite number")]
    NonFiniteQuantity { flow_name: String },
}

impl ConversionError {
    /// The missing unit pair, when this is an unknown-unit failure.
    pub fn unit_pair(&self) -> Option<&UnitPair> {
        match self {
            Self::UnknownUnit { pair, .. } => Some(pair),
            _ => None,
        }
    }

    pub(crate) fn for_flow(self, name: &str) -> Self {
        match self {
            Self::UnknownUnit { pair, .. } => Self::UnknownUnit {
                pair,
                flow_name: Some(name.to_string()),
            },
            other => other,
        }
    }
}

fn describe_flow(flow_name: &Option<String>) -> String {
    match flow_name {
        Some(name) => format!(" (flow '{name}')"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    #[error("invalid functional unit {value} {unit}: {reason}")]
    InvalidFunctionalUnit {
        value: f64,
        unit: String,
        reason: &'static str,
    },

    #[error("reference flow '{flow_name}' not found among {record_count} records")]
    MissingReferenceFlow {
        flow_name: String,
        record_count: usize,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("cannot merge flows from '{source_name}' with different units: {units}")]
    MixedUnits { source_name: String, units: String },
}
