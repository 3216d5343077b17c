//! The JSON record of one pipeline run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use lca_model::FunctionalUnit;

use crate::artifacts::write_atomic;
use crate::error::{ReportError, Result};
use crate::summary::FinalizeSummary;

/// Record counts after each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub raw: usize,
    pub converted: usize,
    pub normalized: usize,
    pub finalized: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub tool_version: String,
    pub functional_unit: FunctionalUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<f64>,
    pub counts: StageCounts,
    pub artifacts: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<FinalizeSummary>,
}

impl RunManifest {
    pub fn new(tool_version: impl Into<String>, functional_unit: FunctionalUnit) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tool_version: tool_version.into(),
            functional_unit,
            operating_hours: None,
            counts: StageCounts::default(),
            artifacts: Vec::new(),
            summary: None,
        }
    }
}

/// Writes the manifest as pretty JSON, replacing any previous one.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    write_atomic(path, |staging| {
        let file = File::create(staging).map_err(|source| ReportError::io(path, source))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, manifest).map_err(|source| ReportError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|source| ReportError::io(path, source))
    })
}
