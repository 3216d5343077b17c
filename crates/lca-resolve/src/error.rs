#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use lca_model::FlowIdentifier;

/// Every flow of a batch that the registry could not match.
///
/// Raised once per batch so all missing flows can be registered before the
/// next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedFlowError {
    /// Unmatched flow names in first-seen order, without repeats.
    pub flow_names: Vec<String>,
    /// Close registry names per unmatched flow (may be empty).
    pub suggestions: BTreeMap<String, Vec<String>>,
}

impl UnresolvedFlowError {
    pub fn len(&self) -> usize {
        self.flow_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flow_names.is_empty()
    }
}

impl fmt::Display for UnresolvedFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} flow(s) not found in registry: {}",
            self.flow_names.len(),
            self.flow_names.join(", ")
        )
    }
}

impl std::error::Error for UnresolvedFlowError {}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Unresolved(#[from] UnresolvedFlowError),

    #[error("flows {} resolve to the same identifier {identifier}", .flow_names.join(", "))]
    DuplicateIdentifier {
        identifier: FlowIdentifier,
        flow_names: Vec<String>,
    },

    #[error(
        "cannot aggregate flows {} under identifier {identifier}: {reason}",
        .flow_names.join(", ")
    )]
    AggregationConflict {
        identifier: FlowIdentifier,
        flow_names: Vec<String>,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid registry entry at line {line}: {message}")]
    InvalidEntry { line: u64, message: String },

    #[error("registry names '{name}' ({role}) twice with different identifiers")]
    ConflictingEntry { name: String, role: String },
}
