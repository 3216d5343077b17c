//! Flow merging and duplicate consolidation.
//!
//! Simulations report some products component by component (each oxide of a
//! roaster product, each element of a feed). `merge_flows` folds such a group
//! into one named flow; `consolidate_duplicates` sums records that describe
//! the same exchange twice.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use lca_model::{ConvertedFlowRecord, MergeAmount, MergeRemoval, MergeRule};

use crate::error::MergeError;
use crate::units::canonical_unit;

/// Applies one merge rule, returning a new record sequence.
///
/// The merged flow copies role, direction and unit from the first member and
/// takes its position. A rule whose source matches nothing returns the input
/// unchanged.
pub fn merge_flows(
    records: &[ConvertedFlowRecord],
    rule: &MergeRule,
) -> Result<Vec<ConvertedFlowRecord>, MergeError> {
    let members: Vec<(usize, &ConvertedFlowRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.source == rule.source)
        .collect();
    let Some(&(first_index, first)) = members.first() else {
        warn!(source = %rule.source, "no flows found for merge source");
        return Ok(records.to_vec());
    };

    let summed: Vec<&ConvertedFlowRecord> = match &rule.amount {
        MergeAmount::Total => members.iter().map(|(_, record)| *record).collect(),
        MergeAmount::First => vec![first],
        MergeAmount::Only(names) => members
            .iter()
            .map(|(_, record)| *record)
            .filter(|record| names.contains(&record.flow_name))
            .collect(),
    };
    ensure_single_unit(&rule.source, &summed)?;

    let mut merged = first.clone();
    merged.flow_name = rule.new_flow_name.clone();
    if let Some(unit) = summed.first().map(|record| record.unit.clone()) {
        merged.unit = unit;
    }
    merged.quantity = summed.iter().map(|record| record.quantity).sum();

    let removed = |record: &ConvertedFlowRecord| -> bool {
        record.source == rule.source
            && match &rule.remove {
                MergeRemoval::All => true,
                MergeRemoval::Only(names) => names.contains(&record.flow_name),
                MergeRemoval::None => false,
            }
    };

    let mut out = Vec::with_capacity(records.len() + 1);
    for (index, record) in records.iter().enumerate() {
        if index == first_index {
            out.push(merged.clone());
        }
        if !removed(record) {
            out.push(record.clone());
        }
    }
    debug!(
        source = %rule.source,
        new_flow = %rule.new_flow_name,
        members = members.len(),
        summed = summed.len(),
        quantity = merged.quantity,
        "merged flows"
    );
    Ok(out)
}

/// Applies merge rules in declaration order.
pub fn apply_merge_rules(
    records: &[ConvertedFlowRecord],
    rules: &[MergeRule],
) -> Result<Vec<ConvertedFlowRecord>, MergeError> {
    let mut current = records.to_vec();
    for rule in rules {
        current = merge_flows(&current, rule)?;
    }
    Ok(current)
}

fn ensure_single_unit(source: &str, records: &[&ConvertedFlowRecord]) -> Result<(), MergeError> {
    let mut units: Vec<String> = records
        .iter()
        .map(|record| canonical_unit(&record.unit))
        .collect();
    units.sort();
    units.dedup();
    if units.len() > 1 {
        return Err(MergeError::MixedUnits {
            source_name: source.to_string(),
            units: units.join(", "),
        });
    }
    Ok(())
}

/// Sums records sharing flow name, role, direction and unit.
///
/// The first occurrence keeps its position (and its source); later duplicates
/// are folded into it.
pub fn consolidate_duplicates(records: &[ConvertedFlowRecord]) -> Vec<ConvertedFlowRecord> {
    let mut positions: BTreeMap<(String, String, String, String), usize> = BTreeMap::new();
    let mut out: Vec<ConvertedFlowRecord> = Vec::with_capacity(records.len());
    for record in records {
        let key = (
            record.flow_name.trim().to_string(),
            record.flow_role.to_string(),
            record.direction.to_string(),
            canonical_unit(&record.unit),
        );
        match positions.get(&key) {
            Some(&index) => out[index].quantity += record.quantity,
            None => {
                positions.insert(key, out.len());
                out.push(record.clone());
            }
        }
    }
    if out.len() < records.len() {
        debug!(
            before = records.len(),
            after = out.len(),
            "consolidated duplicate flows"
        );
    }
    out
}
