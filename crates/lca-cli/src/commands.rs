use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::info_span;

use lca_cli::pipeline::{PipelineOutcome, run_from_flowsheet, run_from_raw};
use lca_ingest::{build_factor_table, load_config, load_recorded_flowsheet, read_raw_table};
use lca_model::PipelineConfig;
use lca_resolve::RegistrySession;
use lca_transform::UnitDimension;

use crate::cli::{ConvertArgs, RunArgs, SearchArgs, UnitsArgs};
use crate::summary::{align_column, apply_table_style, header_cell};

pub fn run_run(args: &RunArgs) -> Result<PipelineOutcome> {
    let config = config_or_default(args.config.as_deref())?;
    let output_dir = output_dir_for(&args.flowsheet, args.output_dir.as_ref());
    let span = info_span!(
        "run",
        flowsheet = %args.flowsheet.display(),
        output_dir = %output_dir.display()
    );
    let _guard = span.enter();

    let mut flowsheet = load_recorded_flowsheet(&args.flowsheet)
        .with_context(|| format!("failed to load flowsheet {}", args.flowsheet.display()))?;
    run_from_flowsheet(&mut flowsheet, &config, &args.registry, &output_dir)
}

pub fn run_convert(args: &ConvertArgs) -> Result<PipelineOutcome> {
    let config = config_or_default(args.config.as_deref())?;
    let output_dir = output_dir_for(&args.raw_csv, args.output_dir.as_ref());
    let span = info_span!(
        "convert_table",
        raw_csv = %args.raw_csv.display(),
        output_dir = %output_dir.display()
    );
    let _guard = span.enter();

    let raw = read_raw_table(&args.raw_csv)
        .with_context(|| format!("failed to read raw flow table {}", args.raw_csv.display()))?;
    run_from_raw(&raw, &config, &args.registry, &output_dir)
}

pub fn run_units(args: &UnitsArgs) -> Result<()> {
    let config = config_or_default(args.config.as_deref())?;
    let factors = build_factor_table(&config).context("failed to build conversion factor table")?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Factor"),
        header_cell("Dimension"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (pair, factor) in factors.iter() {
        let dimension = match UnitDimension::of(&pair.target) {
            Some(UnitDimension::Mass) => "mass",
            Some(UnitDimension::Energy) => "energy",
            Some(UnitDimension::Volume) => "volume",
            Some(UnitDimension::Concentration) => "concentration",
            None => "-",
        };
        table.add_row(vec![
            Cell::new(&pair.source),
            Cell::new(&pair.target),
            Cell::new(format!("{factor}")),
            Cell::new(dimension),
        ]);
    }
    println!("{table}");
    println!("{} factor(s)", factors.len());
    Ok(())
}

pub fn run_search(args: &SearchArgs) -> Result<usize> {
    let session = RegistrySession::open(&args.registry)
        .with_context(|| format!("failed to open flow registry {}", args.registry.display()))?;
    let keywords = args.keywords.join(" ");
    let hits = session.search(&keywords);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Role"),
        header_cell("Category"),
        header_cell("Identifier"),
    ]);
    apply_table_style(&mut table);
    for entry in &hits {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.role),
            Cell::new(entry.category.as_deref().unwrap_or("-")),
            Cell::new(entry.identifier.as_str()),
        ]);
    }
    if hits.is_empty() {
        println!("No registry flows match \"{keywords}\".");
    } else {
        println!("{table}");
    }
    Ok(hits.len())
}

fn config_or_default(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            load_config(path).with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// `--output-dir` when given, else `output/` next to the input file.
fn output_dir_for(input: &Path, output_dir: Option<&PathBuf>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.clone(),
        None => input
            .parent()
            .map_or_else(|| PathBuf::from("output"), |parent| parent.join("output")),
    }
}
