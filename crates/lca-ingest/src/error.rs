#![deny(unsafe_code)]

use std::path::PathBuf;

use lca_model::ModelError;
use lca_simulation::SimulationError;
use lca_transform::ConversionError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid flow record in {path} (line {line}): {source}")]
    InvalidRecord {
        path: PathBuf,
        line: u64,
        #[source]
        source: ModelError,
    },

    #[error("duplicate conversion factor {pair} in {path} (line {line})")]
    DuplicateFactor {
        path: PathBuf,
        pair: String,
        line: u64,
    },

    #[error("invalid conversion factor in {path} (line {line}): {source}")]
    InvalidFactor {
        path: PathBuf,
        line: u64,
        #[source]
        source: ConversionError,
    },

    #[error("invalid configuration {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("invalid flowsheet recording {path}: {source}")]
    Recording {
        path: PathBuf,
        #[source]
        source: SimulationError,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
