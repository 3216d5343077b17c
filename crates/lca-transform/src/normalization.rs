//! Functional-unit normalization.
//!
//! Two bases are supported:
//! - **absolute**: every quantity is divided by the FU value, expressed in the
//!   record's own unit when both share a dimension;
//! - **reference flow**: the run is rescaled so that the named flow equals the
//!   FU, i.e. every quantity is divided by `reference / fu.value`.

use tracing::{debug, warn};

use lca_model::{ConvertedFlowRecord, FunctionalUnit, NormalizedFlowRecord};

use crate::conversion::convert_quantity;
use crate::error::NormalizationError;
use crate::units::{ConversionFactorTable, UnitDimension, canonical_unit};

/// Expresses every record per functional unit.
pub fn normalize(
    records: &[ConvertedFlowRecord],
    fu: &FunctionalUnit,
    table: &ConversionFactorTable,
) -> Result<Vec<NormalizedFlowRecord>, NormalizationError> {
    if !fu.is_valid() {
        return Err(invalid_fu(fu, "value must be a positive finite number"));
    }
    match fu.reference_flow.as_deref() {
        Some(reference) => normalize_to_reference(records, fu, reference, table),
        None => normalize_absolute(records, fu, table),
    }
}

fn normalize_absolute(
    records: &[ConvertedFlowRecord],
    fu: &FunctionalUnit,
    table: &ConversionFactorTable,
) -> Result<Vec<NormalizedFlowRecord>, NormalizationError> {
    let fu_dimension = UnitDimension::of(&fu.unit);
    let mut normalized = Vec::with_capacity(records.len());
    for record in records {
        let divisor = if canonical_unit(&record.unit) == canonical_unit(&fu.unit) {
            fu.value
        } else if fu_dimension.is_some() && fu_dimension == UnitDimension::of(&record.unit) {
            convert_quantity(table, fu.value, &fu.unit, &record.unit)
                .map_err(|error| error.for_flow(&record.flow_name))?
        } else {
            fu.value
        };
        normalized.push(NormalizedFlowRecord::from_converted(
            record,
            record.quantity / divisor,
        ));
    }
    Ok(normalized)
}

fn normalize_to_reference(
    records: &[ConvertedFlowRecord],
    fu: &FunctionalUnit,
    reference: &str,
    table: &ConversionFactorTable,
) -> Result<Vec<NormalizedFlowRecord>, NormalizationError> {
    let reference = reference.trim();
    let mut matches = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.flow_name.trim() == reference);
    let Some((reference_index, reference_record)) = matches.next() else {
        return Err(NormalizationError::MissingReferenceFlow {
            flow_name: reference.to_string(),
            record_count: records.len(),
        });
    };
    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(
            reference_flow = %reference,
            duplicates,
            "multiple records match the reference flow, using the first"
        );
    }

    let reference_amount = convert_quantity(
        table,
        reference_record.quantity,
        &reference_record.unit,
        &fu.unit,
    )
    .map_err(|error| error.for_flow(&reference_record.flow_name))?;
    if !reference_amount.is_finite() || reference_amount <= 0.0 {
        return Err(invalid_fu(
            fu,
            "reference flow quantity must be positive to serve as a basis",
        ));
    }
    let scale = reference_amount / fu.value;
    debug!(reference_flow = %reference, reference_amount, scale, "functional unit scale");

    Ok(records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut normalized =
                NormalizedFlowRecord::from_converted(record, record.quantity / scale);
            normalized.reference_product = index == reference_index;
            normalized
        })
        .collect())
}

fn invalid_fu(fu: &FunctionalUnit, reason: &'static str) -> NormalizationError {
    NormalizationError::InvalidFunctionalUnit {
        value: fu.value,
        unit: fu.unit.clone(),
        reason,
    }
}
