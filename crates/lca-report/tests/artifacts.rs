//! Artifact writing, snapshot of the finalized table and read-back.

use std::fs;

use lca_ingest::{read_finalized_table, read_raw_table};
use lca_model::{
    ConvertedFlowRecord, Direction, FinalizedFlowRecord, FlowIdentifier, FlowRole,
    FunctionalUnit, NormalizedFlowRecord, RawFlowRecord,
};
use lca_report::{
    ArtifactPaths, FinalizeSummary, RunManifest, StageCounts, write_finalized, write_manifest,
    write_raw,
};

fn finalized(
    name: &str,
    quantity: f64,
    role: FlowRole,
    source: &str,
    direction: Direction,
    identifier: &str,
    category: Option<&str>,
) -> FinalizedFlowRecord {
    let raw = RawFlowRecord::new(name, quantity, "kg", role)
        .with_source(source)
        .with_direction(direction);
    let normalized = NormalizedFlowRecord::from_converted(
        &ConvertedFlowRecord::from_raw(&raw, quantity, "kg"),
        quantity,
    );
    FinalizedFlowRecord::from_normalized(
        &normalized,
        FlowIdentifier::new(identifier).unwrap(),
        category.map(str::to_string),
    )
}

fn leach_table() -> Vec<FinalizedFlowRecord> {
    let mut product = finalized(
        "REO_product",
        1.0,
        FlowRole::Product,
        "Roaster Product",
        Direction::Output,
        "0d5b7e52-6c1f-4a7e-9a57-2f1a3c9e0b01",
        Some("Products/Rare earth oxides"),
    );
    product.reference_product = true;
    vec![
        finalized(
            "H2SO4",
            5.0,
            FlowRole::Elementary,
            "Acid Feed",
            Direction::Input,
            "8f2c1d4a-3b5e-4f60-8d7c-9e1a2b3c4d5e",
            Some("Elementary flows/Resource"),
        ),
        product,
        finalized(
            "solid_waste",
            4.0,
            FlowRole::Waste,
            "Solid Residue",
            Direction::Output,
            "5a6b7c8d-9e0f-4a1b-8c2d-3e4f5a6b7c8d",
            None,
        ),
    ]
}

#[test]
fn finalized_table_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());

    write_finalized(&paths.finalized(), &leach_table()).unwrap();

    let contents = fs::read_to_string(paths.finalized()).unwrap();
    insta::assert_snapshot!(contents, @r"
    flow_name,quantity,unit,flow_role,source,direction,identifier,category,reference_product
    H2SO4,5.0,kg,elementary,Acid Feed,input,8f2c1d4a-3b5e-4f60-8d7c-9e1a2b3c4d5e,Elementary flows/Resource,false
    REO_product,1.0,kg,product,Roaster Product,output,0d5b7e52-6c1f-4a7e-9a57-2f1a3c9e0b01,Products/Rare earth oxides,true
    solid_waste,4.0,kg,waste,Solid Residue,output,5a6b7c8d-9e0f-4a1b-8c2d-3e4f5a6b7c8d,,false
    ");
}

#[test]
fn finalized_table_reads_back_with_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    let path = ArtifactPaths::new(dir.path()).finalized();
    let table = leach_table();

    write_finalized(&path, &table).unwrap();
    let read_back = read_finalized_table(&path).unwrap();

    assert_eq!(read_back, table);
}

#[test]
fn empty_table_still_has_a_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = ArtifactPaths::new(dir.path()).raw();

    write_raw(&path, &[]).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "flow_name,quantity,unit,flow_role,source,direction\n"
    );
    assert!(read_raw_table(&path).unwrap().is_empty());
}

#[test]
fn writing_creates_output_dir_and_leaves_no_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path().join("runs").join("leach"));

    write_finalized(&paths.finalized(), &leach_table()).unwrap();

    let names: Vec<String> = fs::read_dir(paths.dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["finalized_flows.csv".to_string()]);
}

#[test]
fn manifest_round_trips_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    let table = leach_table();
    let mut manifest = RunManifest::new(
        "0.1.0",
        FunctionalUnit::new(1.0, "kg").of_flow("REO_product"),
    );
    manifest.counts = StageCounts {
        raw: 3,
        converted: 3,
        normalized: 3,
        finalized: 3,
    };
    manifest.artifacts = vec![paths.finalized()];
    manifest.summary = Some(FinalizeSummary::from_records(&table));

    write_manifest(&paths.manifest(), &manifest).unwrap();

    let text = fs::read_to_string(paths.manifest()).unwrap();
    let parsed: RunManifest = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, manifest);
    assert!(text.contains("\"reference_flow\": \"REO_product\""));
    assert!(manifest.generated_at.ends_with('Z'));
}
