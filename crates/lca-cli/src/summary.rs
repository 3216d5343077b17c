use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lca_cli::pipeline::PipelineOutcome;
use lca_report::FinalizeSummary;

pub fn print_summary(outcome: &PipelineOutcome) {
    println!("Output: {}", outcome.paths.dir().display());
    println!("Manifest: {}", outcome.paths.manifest().display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Flows"),
        header_cell("Table"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let counts = &outcome.counts;
    let paths = &outcome.paths;
    for (stage, flows, path) in [
        ("raw", counts.raw, paths.raw()),
        ("converted", counts.converted, paths.converted()),
        ("normalized", counts.normalized, paths.normalized()),
        ("finalized", counts.finalized, paths.finalized()),
    ] {
        table.add_row(vec![
            Cell::new(stage)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(flows),
            file_cell(&path),
        ]);
    }
    println!("{table}");

    print_category_table(&outcome.summary);
    println!(
        "{} input(s), {} output(s), {} reference product(s), {} registry lookup(s)",
        outcome.summary.inputs,
        outcome.summary.outputs,
        outcome.summary.reference_products,
        outcome.registry_lookups
    );
}

fn print_category_table(summary: &FinalizeSummary) {
    if summary.by_category.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Flows"),
        header_cell("Amount"),
        header_cell("Unit"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for category in &summary.by_category {
        table.add_row(vec![
            Cell::new(&category.category),
            Cell::new(category.flows),
            Cell::new(format_amount(category.total_amount)),
            Cell::new(&category.unit),
        ]);
    }
    for total in &summary.totals_by_unit {
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(total.flows).add_attribute(Attribute::Bold),
            Cell::new(format_amount(total.total_amount)).add_attribute(Attribute::Bold),
            Cell::new(&total.unit).add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn file_cell(path: &Path) -> Cell {
    match path.file_name() {
        Some(name) => Cell::new(name.to_string_lossy()),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

fn format_amount(value: f64) -> String {
    format!("{value:.6}")
}
