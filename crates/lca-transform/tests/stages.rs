//! Scenario tests for the conversion and normalization stages.

use lca_model::{Direction, FlowRole, FunctionalUnit, RawFlowRecord, TargetUnitPolicy};
use lca_transform::{
    ConversionError, ConversionFactorTable, consolidate_duplicates, convert, normalize,
};

fn leach_records() -> Vec<RawFlowRecord> {
    vec![
        RawFlowRecord::new("H2SO4", 10.0, "kg", FlowRole::Elementary),
        RawFlowRecord::new("REO_product", 2.0, "kg", FlowRole::Product)
            .with_direction(Direction::Output),
        RawFlowRecord::new("solid_waste", 8.0, "kg", FlowRole::Waste)
            .with_direction(Direction::Output),
    ]
}

#[test]
fn missing_unit_pair_halts_conversion() {
    let table = ConversionFactorTable::builtin();
    let mut records = leach_records();
    records.push(RawFlowRecord::new("Limestone", 3.0, "lb", FlowRole::Product));

    let result = convert(&records, &table, &TargetUnitPolicy::default());

    let err = result.expect_err("lb has no factor");
    match &err {
        ConversionError::UnknownUnit { pair, flow_name } => {
            assert_eq!(pair.to_string(), "lb->kg");
            assert_eq!(flow_name.as_deref(), Some("Limestone"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("lb->kg"));
}

#[test]
fn configured_factor_resolves_missing_pair() {
    let mut table = ConversionFactorTable::builtin();
    table.insert("lb", "kg", 0.453_592_37).unwrap();
    let records = vec![RawFlowRecord::new("Limestone", 2.0, "lb", FlowRole::Product)];
    let converted = convert(&records, &table, &TargetUnitPolicy::default()).unwrap();
    assert!((converted[0].quantity - 0.907_184_74).abs() < 1e-12);
}

#[test]
fn reference_functional_unit_scales_leach_flows() {
    let table = ConversionFactorTable::builtin();
    let converted = convert(&leach_records(), &table, &TargetUnitPolicy::default()).unwrap();
    let fu = FunctionalUnit::new(1.0, "kg").of_flow("REO_product");

    let normalized = normalize(&converted, &fu, &table).unwrap();

    let quantities: Vec<f64> = normalized.iter().map(|r| r.quantity).collect();
    assert_eq!(quantities, vec![5.0, 1.0, 4.0]);
    assert!(normalized[1].reference_product);
}

#[test]
fn hourly_rates_integrate_over_operating_horizon() {
    let table = ConversionFactorTable::builtin()
        .with_operating_hours(24.0)
        .unwrap();
    let records = vec![
        RawFlowRecord::new("Roaster Product", 0.5, "kg/hr", FlowRole::Product),
        RawFlowRecord::new("Wastewater", 2.0, "m3/hour", FlowRole::Waste),
        RawFlowRecord::new("Electricity", 100.0, "kW", FlowRole::Product),
    ];
    let converted = convert(&records, &table, &TargetUnitPolicy::default()).unwrap();
    assert!((converted[0].quantity - 12.0).abs() < 1e-9);
    assert_eq!(converted[0].unit, "kg");
    assert!((converted[1].quantity - 48_000.0).abs() < 1e-6);
    assert_eq!(converted[1].unit, "L");
    assert!((converted[2].quantity - 8_640.0).abs() < 1e-6);
    assert_eq!(converted[2].unit, "MJ");
}

#[test]
fn rates_without_operating_hours_are_unknown() {
    let table = ConversionFactorTable::builtin();
    let records = vec![RawFlowRecord::new("Roaster Product", 0.5, "kg/hr", FlowRole::Product)];
    let err = convert(&records, &table, &TargetUnitPolicy::default()).unwrap_err();
    assert_eq!(err.unit_pair().unwrap().to_string(), "kg/hr->kg");
}

#[test]
fn consolidation_runs_before_normalization() {
    let table = ConversionFactorTable::builtin();
    let mut records = leach_records();
    records.push(
        RawFlowRecord::new("solid_waste", 2.0, "kg", FlowRole::Waste)
            .with_direction(Direction::Output),
    );
    let converted = convert(&records, &table, &TargetUnitPolicy::default()).unwrap();
    let consolidated = consolidate_duplicates(&converted);
    assert_eq!(consolidated.len(), 3);

    let fu = FunctionalUnit::new(1.0, "kg").of_flow("REO_product");
    let normalized = normalize(&consolidated, &fu, &table).unwrap();
    assert_eq!(normalized[2].quantity, 5.0);
}
