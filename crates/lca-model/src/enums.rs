//! Type-safe enumerations for flow metadata.
//!
//! These enums replace the free-text tags found in simulation exports and
//! stage tables ("Product", "In", ...) with closed sets checked at parse time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Semantic role of a flow in the life-cycle inventory.
///
/// - **Product**: exchanged with another process (feeds, reagents, the main product)
/// - **Waste**: sent to a treatment process (tailings, purge streams, wastewater)
/// - **Elementary**: exchanged directly with the environment (emissions, resources)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum FlowRole {
    Product,
    Waste,
    Elementary,
}

impl FlowRole {
    /// All roles in table order.
    pub const ALL: [FlowRole; 3] = [FlowRole::Product, FlowRole::Waste, FlowRole::Elementary];

    /// Returns the canonical lowercase name used in stage tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowRole::Product => "product",
            FlowRole::Waste => "waste",
            FlowRole::Elementary => "elementary",
        }
    }
}

impl fmt::Display for FlowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowRole {
    type Err = ModelError;

    /// Parse a role string (case-insensitive).
    ///
    /// Accepts the spellings produced by the flowsheet exports as well:
    /// "Material" is a product flow, "Elementary flow" an elementary one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "PRODUCT" | "PRODUCT FLOW" | "MATERIAL" => Ok(FlowRole::Product),
            "WASTE" | "WASTE FLOW" => Ok(FlowRole::Waste),
            "ELEMENTARY" | "ELEMENTARY FLOW" => Ok(FlowRole::Elementary),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for FlowRole {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FlowRole> for String {
    fn from(value: FlowRole) -> Self {
        value.as_str().to_string()
    }
}

/// Whether a flow enters or leaves the modeled process.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    #[default]
    Input,
    Output,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Direction::Input)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "INPUT" | "IN" => Ok(Direction::Input),
            "OUTPUT" | "OUT" => Ok(Direction::Output),
            _ => Err(ModelError::UnknownDirection(s.to_string())),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        value.as_str().to_string()
    }
}

/// How records that resolve to the same registry identifier are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    /// Fail the run and list the colliding flow names.
    #[default]
    Reject,
    /// Sum the quantities into the first record of the group.
    Sum,
}
