//! Pipeline configuration and conversion-factor loading.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use lca_model::PipelineConfig;
use lca_transform::{ConversionFactorTable, UnitPair};

use crate::error::{IngestError, Result};

/// Reads a TOML pipeline configuration.
///
/// A relative `conversion_factors` path is resolved against the directory of
/// the configuration file.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    let mut config: PipelineConfig =
        toml::from_str(&text).map_err(|source| IngestError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
    if let Some(factors) = &config.conversion_factors
        && factors.is_relative()
        && let Some(parent) = path.parent()
    {
        config.conversion_factors = Some(parent.join(factors));
    }
    validate_config(path, &config)?;
    debug!(
        path = %path.display(),
        functional_unit = %config.functional_unit,
        merges = config.merges.len(),
        ports = config.ports.len(),
        "loaded pipeline config"
    );
    Ok(config)
}

fn validate_config(path: &Path, config: &PipelineConfig) -> Result<()> {
    let invalid = |message: String| IngestError::InvalidConfig {
        path: path.to_path_buf(),
        message,
    };
    if !config.functional_unit.is_valid() {
        return Err(invalid(format!(
            "functional unit value must be positive, got {}",
            config.functional_unit.value
        )));
    }
    if config.functional_unit.unit.trim().is_empty() {
        return Err(invalid("functional unit has no unit".to_string()));
    }
    if let Some(hours) = config.operating_hours
        && (!hours.is_finite() || hours <= 0.0)
    {
        return Err(invalid(format!(
            "operating_hours must be positive, got {hours}"
        )));
    }
    for rule in &config.merges {
        if rule.source.trim().is_empty() || rule.new_flow_name.trim().is_empty() {
            return Err(invalid(
                "merge rules need a source and a new_flow_name".to_string(),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct FactorRow {
    source_unit: String,
    target_unit: String,
    factor: f64,
}

/// Adds the factors of a `source_unit,target_unit,factor` CSV to `table`.
///
/// A pair listed twice in the file is an error; a pair already in the table
/// is replaced. Returns the number of factors read.
pub fn read_conversion_factors(path: &Path, table: &mut ConversionFactorTable) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| IngestError::csv(path, source))?;
    let mut seen = BTreeSet::new();
    let mut count = 0;
    for (index, row) in reader.deserialize::<FactorRow>().enumerate() {
        let row = row.map_err(|source| IngestError::csv(path, source))?;
        let line = index as u64 + 2;
        let pair = UnitPair::new(&row.source_unit, &row.target_unit);
        if !seen.insert(pair.clone()) {
            return Err(IngestError::DuplicateFactor {
                path: path.to_path_buf(),
                pair: pair.to_string(),
                line,
            });
        }
        let previous = table
            .insert(&row.source_unit, &row.target_unit, row.factor)
            .map_err(|source| IngestError::InvalidFactor {
                path: path.to_path_buf(),
                line,
                source,
            })?;
        if let Some(previous) = previous {
            debug!(%pair, previous, factor = row.factor, "overriding conversion factor");
        }
        count += 1;
    }
    debug!(path = %path.display(), factors = count, "read conversion factors");
    Ok(count)
}

/// The conversion table a run uses.
///
/// Built-in factors, then the configured factor file, then rate factors for
/// the operating horizon.
pub fn build_factor_table(config: &PipelineConfig) -> Result<ConversionFactorTable> {
    let mut table = ConversionFactorTable::builtin();
    if let Some(path) = &config.conversion_factors {
        read_conversion_factors(path, &mut table)?;
    }
    if let Some(hours) = config.operating_hours {
        table = table.with_operating_hours(hours)?;
    }
    Ok(table)
}
