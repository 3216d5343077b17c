//! A flowsheet replayed from a recorded solve.
//!
//! Recordings are TOML documents captured from a real simulator session:
//!
//! ```toml
//! converged = true
//! diagnostics = ["EXIT: Optimal Solution Found."]
//!
//! [inputs]
//! "leach_solid_feed.flow_mass" = 200.0
//!
//! [[ports]]
//! name = "Solid Feed"
//! kind = "inlet"
//!
//! [[ports.streams]]
//! component = "Yttrium Oxide"
//! basis = 200.0
//! basis_unit = "kg/hr"
//! content = { value = 0.0003, unit = "mass fraction" }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SimulationError};
use crate::model::{FlowsheetModel, Port, PortKind, PortStream, SimulationInputs, SolveReport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedPort {
    pub name: String,
    pub kind: PortKind,
    #[serde(default)]
    pub streams: Vec<PortStream>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    #[serde(default = "default_converged")]
    pub converged: bool,
    #[serde(default)]
    pub diagnostics: Vec<String>,
    /// Inputs the recording was solved with.
    #[serde(default)]
    pub inputs: SimulationInputs,
    #[serde(default)]
    pub ports: Vec<RecordedPort>,
}

fn default_converged() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Loaded,
    Built,
    Solved,
}

/// [`FlowsheetModel`] backed by a [`Recording`].
///
/// The replay cannot re-solve, so inputs that differ from the recorded ones
/// are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct RecordedFlowsheet {
    recording: Recording,
    stage: Stage,
}

impl RecordedFlowsheet {
    pub fn new(recording: Recording) -> Result<Self> {
        let mut seen = std::collections::BTreeSet::new();
        for port in &recording.ports {
            if port.name.trim().is_empty() {
                return Err(SimulationError::InvalidRecording {
                    message: "port with empty name".to_string(),
                });
            }
            if !seen.insert(port.name.as_str()) {
                return Err(SimulationError::InvalidRecording {
                    message: format!("duplicate port '{}'", port.name),
                });
            }
        }
        Ok(Self {
            recording,
            stage: Stage::Loaded,
        })
    }

    /// Parses a TOML recording.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let recording: Recording =
            toml::from_str(text).map_err(|error| SimulationError::InvalidRecording {
                message: error.to_string(),
            })?;
        Self::new(recording)
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }
}

impl FlowsheetModel for RecordedFlowsheet {
    fn build(&mut self) -> Result<()> {
        debug!(ports = self.recording.ports.len(), "building recorded flowsheet");
        self.stage = Stage::Built;
        Ok(())
    }

    fn set_inputs(&mut self, inputs: &SimulationInputs) -> Result<()> {
        if self.stage == Stage::Loaded {
            return Err(SimulationError::model("set_inputs called before build"));
        }
        for (name, value) in inputs.iter() {
            match self.recording.inputs.get(name) {
                Some(recorded) if recorded == value => {}
                recorded => warn!(
                    input = name,
                    requested = value,
                    recorded = ?recorded,
                    "input differs from recording, replaying recorded results"
                ),
            }
        }
        Ok(())
    }

    fn solve(&mut self) -> Result<SolveReport> {
        if self.stage == Stage::Loaded {
            return Err(SimulationError::model("solve called before build"));
        }
        self.stage = Stage::Solved;
        Ok(SolveReport {
            converged: self.recording.converged,
            diagnostics: self.recording.diagnostics.clone(),
        })
    }

    fn ports(&self) -> Vec<Port> {
        self.recording
            .ports
            .iter()
            .map(|port| Port {
                name: port.name.clone(),
                kind: port.kind,
            })
            .collect()
    }

    fn port_streams(&self, port: &str) -> Result<Vec<PortStream>> {
        if self.stage != Stage::Solved || !self.recording.converged {
            return Err(SimulationError::NotSolved);
        }
        self.recording
            .ports
            .iter()
            .find(|recorded| recorded.name == port)
            .map(|recorded| recorded.streams.clone())
            .ok_or_else(|| SimulationError::UnknownPort {
                port: port.to_string(),
            })
    }
}
