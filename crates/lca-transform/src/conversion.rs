//! Unit conversion of raw simulation flows into LCA units.

use tracing::debug;

use lca_model::{ConvertedFlowRecord, FlowRole, RawFlowRecord, TargetUnitPolicy};

use crate::error::ConversionError;
use crate::units::{ConversionFactorTable, RATE_SUFFIX, UnitDimension, canonical_unit};

/// Target unit for a record of `unit` and `role` under `policy`.
///
/// Energy (and power) quantities go to the energy unit, volumes to the volume
/// unit, mass ratios (`mg/kg`, `ppm`, `mass fraction`) to the concentration
/// unit, everything else to the mass-basis unit declared for the role.
pub fn target_unit_for(unit: &str, role: FlowRole, policy: &TargetUnitPolicy) -> String {
    let target = match UnitDimension::of(unit) {
        Some(UnitDimension::Energy) => policy.energy.as_str(),
        Some(UnitDimension::Volume) => policy.volume.as_str(),
        Some(UnitDimension::Concentration) => policy.concentration.as_str(),
        Some(UnitDimension::Mass) | None => policy.roles.unit_for(role),
    };
    canonical_unit(target)
}

/// Converts `quantity` from `source` to `target` with one direct factor.
pub fn convert_quantity(
    table: &ConversionFactorTable,
    quantity: f64,
    source: &str,
    target: &str,
) -> Result<f64, ConversionError> {
    Ok(quantity * table.factor(source, target)?)
}

/// Re-expresses every record in its LCA target unit.
///
/// Fails on the first record whose (unit, target) pair has no factor; no
/// partial output is returned.
pub fn convert(
    records: &[RawFlowRecord],
    table: &ConversionFactorTable,
    policy: &TargetUnitPolicy,
) -> Result<Vec<ConvertedFlowRecord>, ConversionError> {
    let mut converted = Vec::with_capacity(records.len());
    for record in records {
        if !record.quantity.is_finite() {
            return Err(ConversionError::NonFiniteQuantity {
                flow_name: record.flow_name.clone(),
            });
        }
        let target = target_unit_for(&record.unit, record.flow_role, policy);
        let factor = table
            .factor(&record.unit, &target)
            .map_err(|error| error.for_flow(&record.flow_name))?;
        debug!(
            flow_name = %record.flow_name,
            source_unit = %record.unit,
            target_unit = %target,
            factor,
            "converted flow"
        );
        converted.push(ConvertedFlowRecord::from_raw(
            record,
            record.quantity * factor,
            target,
        ));
    }
    Ok(converted)
}

/// True if `unit` is a per-hour rate that needs an operating horizon.
pub fn is_rate_unit(unit: &str) -> bool {
    let canonical = canonical_unit(unit);
    canonical.ends_with(RATE_SUFFIX) || matches!(canonical.as_str(), "W" | "kW" | "MW")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> TargetUnitPolicy {
        TargetUnitPolicy::default()
    }

    #[test]
    fn targets_follow_dimension_then_role() {
        let policy = policy();
        assert_eq!(target_unit_for("g", FlowRole::Product, &policy), "kg");
        assert_eq!(target_unit_for("kWh", FlowRole::Product, &policy), "MJ");
        assert_eq!(target_unit_for("kW", FlowRole::Product, &policy), "MJ");
        assert_eq!(target_unit_for("m3/hour", FlowRole::Waste, &policy), "L");
        assert_eq!(target_unit_for("lb", FlowRole::Waste, &policy), "kg");
        assert_eq!(
            target_unit_for("mg/kg", FlowRole::Elementary, &policy),
            "kg/kg"
        );
        assert_eq!(
            target_unit_for("Mass Fraction", FlowRole::Elementary, &policy),
            "kg/kg"
        );
        assert_eq!(
            target_unit_for("mg/L", FlowRole::Elementary, &policy),
            "kg"
        );
    }

    #[test]
    fn elementary_concentration_goes_to_mass_ratio() {
        let table = ConversionFactorTable::builtin();
        let records = vec![
            RawFlowRecord::new("Cadmium", 5.0, "mg/kg", FlowRole::Elementary),
            RawFlowRecord::new("Thorium", 12.0, "ppm", FlowRole::Elementary),
        ];
        let converted = convert(&records, &table, &policy()).unwrap();
        assert_eq!(converted[0].unit, "kg/kg");
        assert!((converted[0].quantity - 5e-6).abs() < 1e-18);
        assert_eq!(converted[1].unit, "kg/kg");
        assert!((converted[1].quantity - 1.2e-5).abs() < 1e-18);
    }

    #[test]
    fn converts_with_direct_factor() {
        let table = ConversionFactorTable::builtin();
        let records = vec![
            RawFlowRecord::new("Dysprosium Oxide", 250.0, "g", FlowRole::Product),
            RawFlowRecord::new("Electricity", 10.0, "kWh", FlowRole::Product),
        ];
        let converted = convert(&records, &table, &policy()).unwrap();
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].unit, "kg");
        assert!((converted[0].quantity - 0.25).abs() < 1e-12);
        assert_eq!(converted[1].unit, "MJ");
        assert!((converted[1].quantity - 36.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_pair_names_flow() {
        let table = ConversionFactorTable::builtin();
        let records = vec![RawFlowRecord::new("Tailings", 4.0, "lb", FlowRole::Waste)];
        let err = convert(&records, &table, &policy()).unwrap_err();
        assert_eq!(err.unit_pair().map(ToString::to_string).as_deref(), Some("lb->kg"));
        assert!(err.to_string().contains("Tailings"));
    }

    #[test]
    fn non_finite_quantity_is_rejected() {
        let table = ConversionFactorTable::builtin();
        let records = vec![RawFlowRecord::new("Water", f64::NAN, "L", FlowRole::Product)];
        assert!(matches!(
            convert(&records, &table, &policy()),
            Err(ConversionError::NonFiniteQuantity { .. })
        ));
    }

    #[test]
    fn rate_units_are_detected() {
        assert!(is_rate_unit("kg/hr"));
        assert!(is_rate_unit("m3/hour"));
        assert!(is_rate_unit("kw"));
        assert!(!is_rate_unit("kWh"));
        assert!(!is_rate_unit("kg"));
    }
}
