#![deny(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("flowsheet did not converge{}", describe_diagnostics(.diagnostics))]
    NotConverged { diagnostics: Vec<String> },

    #[error("flowsheet has not been solved")]
    NotSolved,

    #[error("no flow role mapped for outlet port '{port}'")]
    UnmappedPort { port: String },

    #[error("unknown port '{port}'")]
    UnknownPort { port: String },

    #[error(
        "cannot combine basis unit '{basis_unit}' with content unit '{content_unit}' \
         for '{component}' at port '{port}'"
    )]
    IncompatibleContent {
        port: String,
        component: String,
        basis_unit: String,
        content_unit: String,
    },

    #[error("invalid flowsheet recording: {message}")]
    InvalidRecording { message: String },

    #[error("simulation model error: {message}")]
    Model { message: String },
}

impl SimulationError {
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Solver output attached to a non-convergence failure.
    pub fn diagnostics(&self) -> &[String] {
        match self {
            Self::NotConverged { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}

fn describe_diagnostics(diagnostics: &[String]) -> String {
    if diagnostics.is_empty() {
        String::new()
    } else {
        format!(": {}", diagnostics.join("; "))
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
