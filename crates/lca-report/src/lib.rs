//! Output side of the LCA flow pipeline.
//!
//! - **artifacts**: raw, converted, normalized and finalized CSV tables
//! - **summary**: totals over a finalized table
//! - **manifest**: `run_manifest.json`

pub mod artifacts;
pub mod error;
pub mod manifest;
pub mod summary;

pub use artifacts::{
    ArtifactPaths, CONVERTED_FLOWS_FILE, FINALIZED_COLUMNS, FINALIZED_FLOWS_FILE, FLOW_COLUMNS,
    MANIFEST_FILE, NORMALIZED_COLUMNS, NORMALIZED_FLOWS_FILE, RAW_FLOWS_FILE, write_converted,
    write_finalized, write_normalized, write_raw, write_table,
};
pub use error::{ReportError, Result};
pub use manifest::{RunManifest, StageCounts, write_manifest};
pub use summary::{CategoryTotal, FinalizeSummary, UNCATEGORIZED, UnitTotal};
