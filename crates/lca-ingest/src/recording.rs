use std::fs;
use std::path::Path;

use lca_simulation::RecordedFlowsheet;

use crate::error::{IngestError, Result};

/// Loads a TOML flowsheet recording for replay.
pub fn load_recorded_flowsheet(path: &Path) -> Result<RecordedFlowsheet> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    RecordedFlowsheet::from_toml_str(&text).map_err(|source| IngestError::Recording {
        path: path.to_path_buf(),
        source,
    })
}
