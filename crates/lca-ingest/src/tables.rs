//! Reading persisted stage tables back into records.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use serde::de::DeserializeOwned;
use tracing::debug;

use lca_model::{
    ConvertedFlowRecord, FinalizedFlowRecord, FlowRecord, NormalizedFlowRecord, RawFlowRecord,
};

use crate::error::{IngestError, Result};

/// Columns every stage table carries.
pub const BASE_COLUMNS: &[&str] = &["flow_name", "quantity", "unit", "flow_role"];

fn read_table<T>(path: &Path, required: &[&str]) -> Result<Vec<T>>
where
    T: DeserializeOwned + FlowRecord,
{
    let file = File::open(path).map_err(|source| IngestError::io(path, source))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers: StringRecord = reader
        .headers()
        .map_err(|source| IngestError::csv(path, source))?
        .iter()
        .map(|header| header.trim_matches('\u{feff}'))
        .collect();
    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(IngestError::MissingColumn {
                path: path.to_path_buf(),
                column: (*column).to_string(),
            });
        }
    }
    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| IngestError::csv(path, source))?;
        let record: T = row
            .deserialize(Some(&headers))
            .map_err(|source| IngestError::csv(path, source))?;
        record.validate().map_err(|source| IngestError::InvalidRecord {
            path: path.to_path_buf(),
            line: row.position().map_or(0, csv::Position::line),
            source,
        })?;
        rows.push(record);
    }
    debug!(path = %path.display(), rows = rows.len(), "read stage table");
    Ok(rows)
}

pub fn read_raw_table(path: &Path) -> Result<Vec<RawFlowRecord>> {
    read_table(path, BASE_COLUMNS)
}

/// Reads a converted table, e.g. to rerun normalization with another
/// functional unit.
pub fn read_converted_table(path: &Path) -> Result<Vec<ConvertedFlowRecord>> {
    read_table(path, BASE_COLUMNS)
}

pub fn read_normalized_table(path: &Path) -> Result<Vec<NormalizedFlowRecord>> {
    read_table(path, BASE_COLUMNS)
}

/// Reads a finalized table; identifiers come back exactly as written, so the
/// table can feed registry population without resolving again.
pub fn read_finalized_table(path: &Path) -> Result<Vec<FinalizedFlowRecord>> {
    let mut required = BASE_COLUMNS.to_vec();
    required.push("identifier");
    read_table(path, &required)
}
