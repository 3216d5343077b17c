//! Explicit stage pipeline for one LCA run.
//!
//! 1. **Simulate**: build and solve the flowsheet, read every port stream
//! 2. **Convert**: raw units to LCA units, then merge rules and consolidation
//! 3. **Normalize**: express every flow per functional unit
//! 4. **Resolve**: bind flows to registry identifiers and categories
//! 5. **Output**: run manifest
//!
//! Every artifact of a previous run is removed first. Each stage table is
//! written before the next stage starts, so a failed run leaves exactly the
//! tables of its own completed stages behind. The finalized table and the
//! manifest exist only for a run that completed.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use lca_ingest::build_factor_table;
use lca_model::{
    ConvertedFlowRecord, FinalizedFlowRecord, NormalizedFlowRecord, PipelineConfig, RawFlowRecord,
};
use lca_report::{
    ArtifactPaths, FinalizeSummary, RunManifest, StageCounts, write_converted, write_finalized,
    write_manifest, write_normalized, write_raw,
};
use lca_resolve::{FlowRegistry, RegistrySession, resolve};
use lca_simulation::{FlowsheetModel, PortRoleMap, SimulationInputs, run_simulation};
use lca_transform::{
    ConversionFactorTable, apply_merge_rules, consolidate_duplicates, convert, is_rate_unit,
    normalize,
};

/// Everything a completed run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub paths: ArtifactPaths,
    pub counts: StageCounts,
    pub finalized: Vec<FinalizedFlowRecord>,
    pub summary: FinalizeSummary,
    pub registry_lookups: usize,
}

/// Output of the conversion stage.
#[derive(Debug)]
pub struct ConvertResult {
    pub converted: Vec<ConvertedFlowRecord>,
    /// Factor table the run used; normalization reuses it.
    pub factors: ConversionFactorTable,
}

/// Runs every stage starting from a flowsheet model.
pub fn run_from_flowsheet<M>(
    model: &mut M,
    config: &PipelineConfig,
    registry_path: &Path,
    output_dir: &Path,
) -> Result<PipelineOutcome>
where
    M: FlowsheetModel + ?Sized,
{
    let paths = prepare_output(output_dir)?;
    let registry = open_registry(registry_path)?;

    // =========================================================================
    // Stage 1: Simulate - Build, solve and extract port flows
    // =========================================================================
    let raw = simulate(model, config)?;
    write_raw(&paths.raw(), &raw).context("failed to write raw flow table")?;

    finish(&raw, config, &registry, paths)
}

/// Runs every stage after simulation on an existing raw table.
pub fn run_from_raw(
    raw: &[RawFlowRecord],
    config: &PipelineConfig,
    registry_path: &Path,
    output_dir: &Path,
) -> Result<PipelineOutcome> {
    let paths = prepare_output(output_dir)?;
    let registry = open_registry(registry_path)?;
    write_raw(&paths.raw(), raw).context("failed to write raw flow table")?;
    finish(raw, config, &registry, paths)
}

fn finish(
    raw: &[RawFlowRecord],
    config: &PipelineConfig,
    registry: &RegistrySession,
    paths: ArtifactPaths,
) -> Result<PipelineOutcome> {
    // =========================================================================
    // Stage 2: Convert - LCA units, merge rules, duplicate consolidation
    // =========================================================================
    let ConvertResult { converted, factors } = convert_stage(raw, config)?;
    write_converted(&paths.converted(), &converted)
        .context("failed to write converted flow table")?;

    // =========================================================================
    // Stage 3: Normalize - Express flows per functional unit
    // =========================================================================
    let normalized = normalize_stage(&converted, config, &factors)?;
    write_normalized(&paths.normalized(), &normalized)
        .context("failed to write normalized flow table")?;

    // =========================================================================
    // Stage 4: Resolve - Registry identifiers and categories
    // =========================================================================
    let finalized = resolve_stage(&normalized, registry, config)?;
    write_finalized(&paths.finalized(), &finalized)
        .context("failed to write finalized flow table")?;

    // =========================================================================
    // Stage 5: Output - Run manifest
    // =========================================================================
    let counts = StageCounts {
        raw: raw.len(),
        converted: converted.len(),
        normalized: normalized.len(),
        finalized: finalized.len(),
    };
    let summary = FinalizeSummary::from_records(&finalized);
    let mut manifest = RunManifest::new(
        env!("CARGO_PKG_VERSION"),
        config.functional_unit.clone(),
    );
    manifest.operating_hours = config.operating_hours;
    manifest.counts = counts;
    manifest.artifacts = vec![
        paths.raw(),
        paths.converted(),
        paths.normalized(),
        paths.finalized(),
    ];
    manifest.summary = Some(summary.clone());
    write_manifest(&paths.manifest(), &manifest).context("failed to write run manifest")?;
    info!(
        flows = finalized.len(),
        output_dir = %paths.dir().display(),
        "run complete"
    );

    Ok(PipelineOutcome {
        paths,
        counts,
        finalized,
        summary,
        registry_lookups: registry.lookups(),
    })
}

/// Solves `model` with the configured inputs and extracts raw flows.
pub fn simulate<M>(model: &mut M, config: &PipelineConfig) -> Result<Vec<RawFlowRecord>>
where
    M: FlowsheetModel + ?Sized,
{
    let inputs = config
        .inputs
        .iter()
        .fold(SimulationInputs::new(), |inputs, (name, value)| {
            inputs.with(name.as_str(), *value)
        });
    let port_roles = config
        .ports
        .iter()
        .fold(PortRoleMap::new(), |roles, (port, role)| {
            roles.with(port.as_str(), *role)
        });

    let span = info_span!("simulate", inputs = config.inputs.len());
    let start = Instant::now();
    let raw = span
        .in_scope(|| run_simulation(model, &inputs, &port_roles))
        .context("flowsheet simulation failed")?;
    info!(
        flows = raw.len(),
        duration_ms = start.elapsed().as_millis(),
        "simulate complete"
    );
    Ok(raw)
}

/// Converts raw flows and applies the configured merges.
pub fn convert_stage(raw: &[RawFlowRecord], config: &PipelineConfig) -> Result<ConvertResult> {
    let span = info_span!("convert", flows = raw.len());
    let _guard = span.enter();
    let start = Instant::now();

    let factors = build_factor_table(config).context("failed to build conversion factor table")?;
    if config.operating_hours.is_none() {
        let rate_units: BTreeSet<&str> = raw
            .iter()
            .filter(|record| is_rate_unit(&record.unit))
            .map(|record| record.unit.as_str())
            .collect();
        if !rate_units.is_empty() {
            warn!(
                units = ?rate_units,
                "rate units present but operating_hours is not configured"
            );
        }
    }

    let converted = convert(raw, &factors, &config.units).context("unit conversion failed")?;
    let mut merged =
        apply_merge_rules(&converted, &config.merges).context("flow merge failed")?;
    if config.consolidate_duplicates {
        merged = consolidate_duplicates(&merged);
    }
    debug!(
        converted = converted.len(),
        merged = merged.len(),
        "applied merge rules"
    );
    info!(
        flows = merged.len(),
        factors = factors.len(),
        duration_ms = start.elapsed().as_millis(),
        "convert complete"
    );
    Ok(ConvertResult {
        converted: merged,
        factors,
    })
}

pub fn normalize_stage(
    converted: &[ConvertedFlowRecord],
    config: &PipelineConfig,
    factors: &ConversionFactorTable,
) -> Result<Vec<NormalizedFlowRecord>> {
    let span = info_span!(
        "normalize",
        functional_unit = %config.functional_unit
    );
    let start = Instant::now();
    let normalized = span
        .in_scope(|| normalize(converted, &config.functional_unit, factors))
        .context("normalization failed")?;
    info!(
        flows = normalized.len(),
        duration_ms = start.elapsed().as_millis(),
        "normalize complete"
    );
    Ok(normalized)
}

pub fn resolve_stage<R>(
    normalized: &[NormalizedFlowRecord],
    registry: &R,
    config: &PipelineConfig,
) -> Result<Vec<FinalizedFlowRecord>>
where
    R: FlowRegistry + ?Sized,
{
    let span = info_span!("resolve", flows = normalized.len());
    let start = Instant::now();
    let finalized = span
        .in_scope(|| resolve(normalized, registry, config.aggregation))
        .context("flow resolution failed")?;
    info!(
        flows = finalized.len(),
        duration_ms = start.elapsed().as_millis(),
        "resolve complete"
    );
    Ok(finalized)
}

fn open_registry(path: &Path) -> Result<RegistrySession> {
    RegistrySession::open(path)
        .with_context(|| format!("failed to open flow registry {}", path.display()))
}

/// Creates the output directory and drops every artifact of a previous run.
fn prepare_output(output_dir: &Path) -> Result<ArtifactPaths> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let paths = ArtifactPaths::new(output_dir);
    for path in [
        paths.raw(),
        paths.converted(),
        paths.normalized(),
        paths.finalized(),
        paths.manifest(),
    ] {
        remove_previous(&path)?;
    }
    Ok(paths)
}

fn remove_previous(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed artifact of previous run");
            Ok(())
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => {
            Err(error).with_context(|| format!("failed to remove {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use lca_model::FlowRole;

    use super::*;

    #[test]
    fn consolidation_can_be_disabled() {
        let raw = vec![
            RawFlowRecord::new("Water", 1000.0, "g", FlowRole::Product).with_source("Acid Feed"),
            RawFlowRecord::new("Water", 2.0, "kg", FlowRole::Product).with_source("Rinse"),
        ];
        let mut config = PipelineConfig::default();

        let merged = convert_stage(&raw, &config).unwrap();
        assert_eq!(merged.converted.len(), 1);
        assert!((merged.converted[0].quantity - 3.0).abs() < 1e-12);

        config.consolidate_duplicates = false;
        let kept = convert_stage(&raw, &config).unwrap();
        assert_eq!(kept.converted.len(), 2);
    }

    #[test]
    fn previous_run_artifacts_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let stale: Vec<_> = ["converted_flows.csv", "finalized_flows.csv", "run_manifest.json"]
            .iter()
            .map(|name| dir.path().join(name))
            .collect();
        for path in &stale {
            fs::write(path, "flow_name\n").unwrap();
        }
        let unrelated = dir.path().join("notes.txt");
        fs::write(&unrelated, "keep").unwrap();

        prepare_output(dir.path()).unwrap();

        assert!(stale.iter().all(|path| !path.exists()));
        assert!(unrelated.exists());
    }
}
