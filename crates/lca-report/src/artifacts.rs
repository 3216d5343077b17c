//! Stage tables written to the run's output directory.
//!
//! Every table is written to a hidden sibling file and renamed into place,
//! so an interrupted run never leaves a truncated table under the final
//! name. The header row is written even for empty tables.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use lca_model::{ConvertedFlowRecord, FinalizedFlowRecord, NormalizedFlowRecord, RawFlowRecord};

use crate::error::{ReportError, Result};

pub const RAW_FLOWS_FILE: &str = "raw_flows.csv";
pub const CONVERTED_FLOWS_FILE: &str = "converted_flows.csv";
pub const NORMALIZED_FLOWS_FILE: &str = "normalized_flows.csv";
pub const FINALIZED_FLOWS_FILE: &str = "finalized_flows.csv";
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// Columns of the raw and converted tables, in record field order.
pub const FLOW_COLUMNS: &[&str] = &[
    "flow_name",
    "quantity",
    "unit",
    "flow_role",
    "source",
    "direction",
];

pub const NORMALIZED_COLUMNS: &[&str] = &[
    "flow_name",
    "quantity",
    "unit",
    "flow_role",
    "source",
    "direction",
    "reference_product",
];

pub const FINALIZED_COLUMNS: &[&str] = &[
    "flow_name",
    "quantity",
    "unit",
    "flow_role",
    "source",
    "direction",
    "identifier",
    "category",
    "reference_product",
];

/// Artifact locations inside one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn raw(&self) -> PathBuf {
        self.dir.join(RAW_FLOWS_FILE)
    }

    pub fn converted(&self) -> PathBuf {
        self.dir.join(CONVERTED_FLOWS_FILE)
    }

    pub fn normalized(&self) -> PathBuf {
        self.dir.join(NORMALIZED_FLOWS_FILE)
    }

    pub fn finalized(&self) -> PathBuf {
        self.dir.join(FINALIZED_FLOWS_FILE)
    }

    pub fn manifest(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }
}

/// Hidden sibling used while a file is being written.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Writes `contents` via the staging file, then renames it over `path`.
pub(crate) fn write_atomic<F>(path: &Path, contents: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReportError::io(parent, source))?;
    }
    let staging = staging_path(path);
    let written = contents(&staging)
        .and_then(|()| fs::rename(&staging, path).map_err(|source| ReportError::io(path, source)));
    if written.is_err() {
        let _ = fs::remove_file(&staging);
    }
    written
}

/// Writes `records` as CSV under `columns`.
///
/// `columns` must list the serialized fields of `T` in declaration order.
pub fn write_table<T: Serialize>(path: &Path, columns: &[&str], records: &[T]) -> Result<()> {
    write_atomic(path, |staging| {
        let csv_error = |source: csv::Error| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(staging)
            .map_err(csv_error)?;
        writer.write_record(columns).map_err(csv_error)?;
        for record in records {
            writer.serialize(record).map_err(csv_error)?;
        }
        writer
            .flush()
            .map_err(|source| ReportError::io(path, source))
    })?;
    debug!(path = %path.display(), rows = records.len(), "wrote stage table");
    Ok(())
}

pub fn write_raw(path: &Path, records: &[RawFlowRecord]) -> Result<()> {
    write_table(path, FLOW_COLUMNS, records)
}

pub fn write_converted(path: &Path, records: &[ConvertedFlowRecord]) -> Result<()> {
    write_table(path, FLOW_COLUMNS, records)
}

pub fn write_normalized(path: &Path, records: &[NormalizedFlowRecord]) -> Result<()> {
    write_table(path, NORMALIZED_COLUMNS, records)
}

pub fn write_finalized(path: &Path, records: &[FinalizedFlowRecord]) -> Result<()> {
    write_table(path, FINALIZED_COLUMNS, records)
}
