//! Binding normalized flows to registry identifiers.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use lca_model::{AggregationPolicy, FinalizedFlowRecord, FlowIdentifier, NormalizedFlowRecord};

use crate::error::{ResolveError, UnresolvedFlowError};
use crate::registry::FlowRegistry;

/// Attaches a registry identifier and category to every record.
///
/// Every record is looked up before any error is raised, so a batch with
/// missing flows fails once with all of them listed. Identifiers are unique
/// in the result; records that share one are handled per `policy`.
pub fn resolve<R>(
    records: &[NormalizedFlowRecord],
    registry: &R,
    policy: AggregationPolicy,
) -> Result<Vec<FinalizedFlowRecord>, ResolveError>
where
    R: FlowRegistry + ?Sized,
{
    let mut finalized = Vec::with_capacity(records.len());
    let mut unresolved = UnresolvedFlowError {
        flow_names: Vec::new(),
        suggestions: BTreeMap::new(),
    };
    for record in records {
        match registry.lookup(record.flow_name.trim(), record.flow_role) {
            Some(hit) => finalized.push(FinalizedFlowRecord::from_normalized(
                record,
                hit.identifier,
                hit.category,
            )),
            None => {
                if !unresolved.flow_names.contains(&record.flow_name) {
                    let suggestions = registry.suggest(record.flow_name.trim(), record.flow_role);
                    if !suggestions.is_empty() {
                        unresolved
                            .suggestions
                            .insert(record.flow_name.clone(), suggestions);
                    }
                    unresolved.flow_names.push(record.flow_name.clone());
                }
            }
        }
    }
    if !unresolved.is_empty() {
        warn!(
            unresolved = unresolved.len(),
            records = records.len(),
            "flows missing from registry"
        );
        return Err(unresolved.into());
    }
    debug!(records = finalized.len(), "resolved flows");
    aggregate(finalized, policy)
}

fn aggregate(
    records: Vec<FinalizedFlowRecord>,
    policy: AggregationPolicy,
) -> Result<Vec<FinalizedFlowRecord>, ResolveError> {
    let mut groups: BTreeMap<FlowIdentifier, Vec<usize>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        groups
            .entry(record.identifier.clone())
            .or_default()
            .push(index);
    }
    let shared: Vec<&Vec<usize>> = groups.values().filter(|members| members.len() > 1).collect();
    if shared.is_empty() {
        return Ok(records);
    }

    if policy == AggregationPolicy::Reject {
        let members = shared[0];
        return Err(ResolveError::DuplicateIdentifier {
            identifier: records[members[0]].identifier.clone(),
            flow_names: member_names(&records, members),
        });
    }

    let mut folded_into: BTreeMap<usize, usize> = BTreeMap::new();
    for members in &shared {
        let first = &records[members[0]];
        for &index in &members[1..] {
            if records[index].direction != first.direction {
                return Err(ResolveError::AggregationConflict {
                    identifier: first.identifier.clone(),
                    flow_names: member_names(&records, members),
                    reason: format!(
                        "directions differ ({} vs {})",
                        first.direction, records[index].direction
                    ),
                });
            }
            if records[index].unit.trim() != first.unit.trim() {
                return Err(ResolveError::AggregationConflict {
                    identifier: first.identifier.clone(),
                    flow_names: member_names(&records, members),
                    reason: format!(
                        "units differ ({} vs {})",
                        first.unit, records[index].unit
                    ),
                });
            }
            folded_into.insert(index, members[0]);
        }
    }

    let mut out: Vec<FinalizedFlowRecord> = Vec::with_capacity(records.len() - folded_into.len());
    let mut positions: BTreeMap<usize, usize> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        match folded_into.get(&index) {
            Some(target) => {
                let position = positions[target];
                out[position].quantity += record.quantity;
                out[position].reference_product |= record.reference_product;
            }
            None => {
                positions.insert(index, out.len());
                out.push(record.clone());
            }
        }
    }
    debug!(
        before = records.len(),
        after = out.len(),
        "summed flows sharing an identifier"
    );
    Ok(out)
}

fn member_names(records: &[FinalizedFlowRecord], members: &[usize]) -> Vec<String> {
    members
        .iter()
        .map(|&index| records[index].flow_name.clone())
        .collect()
}
