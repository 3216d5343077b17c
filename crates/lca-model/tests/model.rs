//! Tests for lca-model types.

use lca_model::{
    AggregationPolicy, Direction, FinalizedFlowRecord, FlowIdentifier, FlowRecord, FlowRole,
    MergeAmount, MergeRemoval, ModelError, NormalizedFlowRecord, PipelineConfig, RawFlowRecord,
};

#[test]
fn config_defaults_fill_missing_sections() {
    let config: PipelineConfig = toml::from_str(
        r#"
[functional_unit]
value = 1.0
unit = "kg"
reference_flow = "REO_product"
"#,
    )
    .expect("parse config");

    assert_eq!(config.functional_unit.reference_flow.as_deref(), Some("REO_product"));
    assert_eq!(config.units.energy, "MJ");
    assert_eq!(config.units.volume, "L");
    assert_eq!(config.units.concentration, "kg/kg");
    assert_eq!(config.units.roles.unit_for(FlowRole::Waste), "kg");
    assert_eq!(config.aggregation, AggregationPolicy::Reject);
    assert!(config.consolidate_duplicates);
    assert!(config.merges.is_empty());
    assert!(config.operating_hours.is_none());
}

#[test]
fn config_parses_merge_rules_and_overrides() {
    let config: PipelineConfig = toml::from_str(
        r#"
operating_hours = 8760.0
aggregation = "sum"

[functional_unit]
value = 1.0
unit = "kg"

[units]
energy = "kWh"

[units.roles]
elementary = "g"

[[merge]]
source = "Solid Feed"
new_flow_name = "REO Feed"
amount = { only = ["Yttrium Oxide", "Cerium Oxide"] }

[[merge]]
source = "Roaster Product"
new_flow_name = "REO Product"
remove = "none"
"#,
    )
    .expect("parse config");

    assert_eq!(config.operating_hours, Some(8760.0));
    assert_eq!(config.aggregation, AggregationPolicy::Sum);
    assert_eq!(config.units.energy, "kWh");
    assert_eq!(config.units.volume, "L");
    assert_eq!(config.units.roles.unit_for(FlowRole::Elementary), "g");
    assert_eq!(config.units.roles.unit_for(FlowRole::Product), "kg");
    assert_eq!(config.merges.len(), 2);
    assert_eq!(
        config.merges[0].amount,
        MergeAmount::Only(vec!["Yttrium Oxide".to_string(), "Cerium Oxide".to_string()])
    );
    assert_eq!(config.merges[0].remove, MergeRemoval::All);
    assert_eq!(config.merges[1].amount, MergeAmount::Total);
    assert_eq!(config.merges[1].remove, MergeRemoval::None);
}

#[test]
fn raw_record_builder_sets_provenance() {
    let record = RawFlowRecord::new("Kerosene", 3.5, "kg/hr", FlowRole::Product)
        .with_source("Rougher Organic Make-up")
        .with_direction(Direction::Input);
    assert_eq!(record.source, "Rougher Organic Make-up");
    assert!(record.direction.is_input());
    assert!(record.validate().is_ok());
}

#[test]
fn blank_name_or_unit_fails_validation() {
    let nameless = RawFlowRecord::new("  ", 1.0, "kg", FlowRole::Product);
    assert_eq!(nameless.validate(), Err(ModelError::EmptyFlowName));

    let unitless = RawFlowRecord::new("Tailings", 1.0, "", FlowRole::Waste);
    assert_eq!(
        unitless.validate(),
        Err(ModelError::EmptyUnit("Tailings".to_string()))
    );
}

#[test]
fn finalized_record_serializes_identifier_as_string() {
    let normalized = NormalizedFlowRecord {
        flow_name: "H2SO4".to_string(),
        quantity: 5.0,
        unit: "kg".to_string(),
        flow_role: FlowRole::Elementary,
        source: String::new(),
        direction: Direction::Input,
        reference_product: false,
    };
    let identifier = FlowIdentifier::new("flow-0001").unwrap();
    let finalized =
        FinalizedFlowRecord::from_normalized(&normalized, identifier, Some("Emissions".into()));

    let json = serde_json::to_value(&finalized).expect("serialize record");
    assert_eq!(json["identifier"], "flow-0001");
    assert_eq!(json["flow_role"], "elementary");
    assert_eq!(json["direction"], "input");

    let round: FinalizedFlowRecord = serde_json::from_value(json).expect("deserialize record");
    assert_eq!(round, finalized);
}

#[test]
fn empty_identifier_fails_deserialization() {
    let result: Result<FlowIdentifier, _> = serde_json::from_str("\"\"");
    assert!(result.is_err());
}

#[test]
fn config_parses_port_roles_and_inputs() {
    let config: PipelineConfig = toml::from_str(
        r#"
[ports]
"Leach Liquor" = "product"
"Solid Residue" = "waste"

[inputs]
"leach_solid_feed.flow_mass" = 200.0
"#,
    )
    .expect("parse config");

    assert_eq!(config.ports.get("Solid Residue"), Some(&FlowRole::Waste));
    assert_eq!(config.inputs.get("leach_solid_feed.flow_mass"), Some(&200.0));
}
