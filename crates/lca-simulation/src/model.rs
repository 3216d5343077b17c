//! Collaborator interface of the external flowsheet simulator.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lca_model::{Direction, FlowRole};

use crate::error::{Result, SimulationError};

/// Side of the flowsheet boundary a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Inlet,
    Outlet,
}

impl PortKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortKind::Inlet => "inlet",
            PortKind::Outlet => "outlet",
        }
    }

    /// Exchange direction of flows crossing this port.
    pub fn direction(&self) -> Direction {
        match self {
            PortKind::Inlet => Direction::Input,
            PortKind::Outlet => Direction::Output,
        }
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inlet" | "in" | "feed" => Ok(PortKind::Inlet),
            "outlet" | "out" => Ok(PortKind::Outlet),
            other => Err(SimulationError::InvalidRecording {
                message: format!("unknown port kind '{other}'"),
            }),
        }
    }
}

/// A named boundary port of the flowsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub kind: PortKind,
}

impl Port {
    pub fn inlet(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Inlet,
        }
    }

    pub fn outlet(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Outlet,
        }
    }
}

/// Composition of a stream, e.g. a mass fraction or a concentration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamContent {
    pub value: f64,
    pub unit: String,
}

/// One component reported at a port.
///
/// `basis` is the stream's total flow (e.g. `kg/hr` of solid feed or `L/hr`
/// of liquor). When `content` is present the component quantity is
/// `basis * content.value`; otherwise the basis is the component quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortStream {
    pub component: String,
    pub basis: f64,
    pub basis_unit: String,
    #[serde(default)]
    pub content: Option<StreamContent>,
}

impl PortStream {
    pub fn total(component: impl Into<String>, basis: f64, basis_unit: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            basis,
            basis_unit: basis_unit.into(),
            content: None,
        }
    }

    #[must_use]
    pub fn with_content(mut self, value: f64, unit: impl Into<String>) -> Self {
        self.content = Some(StreamContent {
            value,
            unit: unit.into(),
        });
        self
    }
}

/// Named numeric inputs handed to the model before solving.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationInputs {
    values: BTreeMap<String, f64>,
}

impl SimulationInputs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of a solve: convergence plus the solver's own messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub converged: bool,
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl SolveReport {
    pub fn converged() -> Self {
        Self {
            converged: true,
            diagnostics: Vec::new(),
        }
    }

    pub fn failed(diagnostics: Vec<String>) -> Self {
        Self {
            converged: false,
            diagnostics,
        }
    }
}

/// Caller-supplied flow role for each port.
///
/// Outlets need an explicit entry (a liquid outlet can be product or waste
/// depending on the flowsheet); inlets fall back to [`FlowRole::Product`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortRoleMap {
    roles: BTreeMap<String, FlowRole>,
}

impl PortRoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, port: impl Into<String>, role: FlowRole) -> Self {
        self.roles.insert(port.into(), role);
        self
    }

    pub fn insert(&mut self, port: impl Into<String>, role: FlowRole) -> Option<FlowRole> {
        self.roles.insert(port.into(), role)
    }

    pub fn get(&self, port: &str) -> Option<FlowRole> {
        self.roles.get(port).copied()
    }

    /// Role for `port`, applying the inlet default.
    pub fn role_for(&self, port: &Port) -> Result<FlowRole> {
        match (self.get(&port.name), port.kind) {
            (Some(role), _) => Ok(role),
            (None, PortKind::Inlet) => Ok(FlowRole::Product),
            (None, PortKind::Outlet) => Err(SimulationError::UnmappedPort {
                port: port.name.clone(),
            }),
        }
    }
}

/// The external process model, seen through the narrow interface the
/// pipeline needs.
///
/// Implementations wrap a simulator session; the adapter drives them through
/// build, set inputs and solve, then reads every port.
pub trait FlowsheetModel {
    fn build(&mut self) -> Result<()>;

    fn set_inputs(&mut self, inputs: &SimulationInputs) -> Result<()>;

    fn solve(&mut self) -> Result<SolveReport>;

    /// Boundary ports in a stable order.
    fn ports(&self) -> Vec<Port>;

    /// Streams reported at `port` after a successful solve.
    fn port_streams(&self, port: &str) -> Result<Vec<PortStream>>;
}
