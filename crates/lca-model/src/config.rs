//! Static pipeline configuration.
//!
//! The structures here are plain data; loading them from TOML lives in
//! `lca-ingest`. Every field has a default so a config file only needs to
//! declare what differs from the defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::enums::{AggregationPolicy, FlowRole};
use crate::functional_unit::FunctionalUnit;

/// Target mass-basis unit for each flow role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleUnits {
    pub product: String,
    pub waste: String,
    pub elementary: String,
}

impl RoleUnits {
    pub fn unit_for(&self, role: FlowRole) -> &str {
        match role {
            FlowRole::Product => &self.product,
            FlowRole::Waste => &self.waste,
            FlowRole::Elementary => &self.elementary,
        }
    }
}

impl Default for RoleUnits {
    fn default() -> Self {
        Self {
            product: "kg".to_string(),
            waste: "kg".to_string(),
            elementary: "kg".to_string(),
        }
    }
}

/// Which LCA unit each record is converted into.
///
/// Energy, volume and concentration quantities keep their own dimension;
/// everything else is converted into the mass-basis unit of the record's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetUnitPolicy {
    pub energy: String,
    pub volume: String,
    /// Target for mass ratios such as `mg/kg`, `ppm` or `mass fraction`.
    pub concentration: String,
    pub roles: RoleUnits,
}

impl Default for TargetUnitPolicy {
    fn default() -> Self {
        Self {
            energy: "MJ".to_string(),
            volume: "L".to_string(),
            concentration: "kg/kg".to_string(),
            roles: RoleUnits::default(),
        }
    }
}

/// How the quantity of a merged flow is computed from its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeAmount {
    /// Sum of all member quantities.
    #[default]
    Total,
    /// Quantity of the first member.
    First,
    /// Sum of the named members only.
    Only(Vec<String>),
}

/// Which member records are dropped once the merged flow is inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRemoval {
    #[default]
    All,
    Only(Vec<String>),
    None,
}

/// Combines every record read from `source` into one flow named `new_flow_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    pub source: String,
    pub new_flow_name: String,
    #[serde(default)]
    pub amount: MergeAmount,
    #[serde(default)]
    pub remove: MergeRemoval,
}

/// Complete configuration of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub functional_unit: FunctionalUnit,
    pub units: TargetUnitPolicy,
    /// Hours over which simulated rates (`kg/hr`, `kW`, ...) are integrated.
    pub operating_hours: Option<f64>,
    /// Extra conversion factors merged over the built-in table.
    pub conversion_factors: Option<PathBuf>,
    pub aggregation: AggregationPolicy,
    /// Sum records sharing name, role, direction and unit before resolution.
    pub consolidate_duplicates: bool,
    #[serde(rename = "merge")]
    pub merges: Vec<MergeRule>,
    /// Flow role of each flowsheet port; outlets must be listed.
    pub ports: BTreeMap<String, FlowRole>,
    /// Named inputs handed to the simulation before solving.
    pub inputs: BTreeMap<String, f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            functional_unit: FunctionalUnit::default(),
            units: TargetUnitPolicy::default(),
            operating_hours: None,
            conversion_factors: None,
            aggregation: AggregationPolicy::default(),
            consolidate_duplicates: true,
            merges: Vec::new(),
            ports: BTreeMap::new(),
            inputs: BTreeMap::new(),
        }
    }
}
