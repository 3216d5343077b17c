//! Totals over a finalized table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lca_model::{Direction, FinalizedFlowRecord};

/// Category label for records the registry left uncategorized.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Amount of one category in one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub unit: String,
    pub flows: usize,
    pub total_amount: f64,
}

/// Amount of every flow reported in one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTotal {
    pub unit: String,
    pub flows: usize,
    pub total_amount: f64,
}

/// Counts and per-unit amounts of a finalized run.
///
/// Amounts are only ever added within one unit; a run reporting kg, MJ and
/// L has three totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalizeSummary {
    pub total_flows: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub reference_products: usize,
    pub unique_categories: usize,
    /// Ordered by unit.
    pub totals_by_unit: Vec<UnitTotal>,
    /// Ordered by category name, then unit.
    pub by_category: Vec<CategoryTotal>,
}

impl FinalizeSummary {
    pub fn from_records(records: &[FinalizedFlowRecord]) -> Self {
        let mut categories: BTreeMap<(&str, &str), (usize, f64)> = BTreeMap::new();
        let mut units: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        let mut named = BTreeSet::new();
        let mut summary = Self {
            total_flows: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.direction {
                Direction::Input => summary.inputs += 1,
                Direction::Output => summary.outputs += 1,
            }
            if record.reference_product {
                summary.reference_products += 1;
            }
            let unit = record.unit.trim();
            let entry = units.entry(unit).or_default();
            entry.0 += 1;
            entry.1 += record.quantity;
            let category = match record.category.as_deref() {
                Some(category) if !category.trim().is_empty() => {
                    named.insert(category);
                    category
                }
                _ => UNCATEGORIZED,
            };
            let entry = categories.entry((category, unit)).or_default();
            entry.0 += 1;
            entry.1 += record.quantity;
        }
        summary.unique_categories = named.len();
        summary.totals_by_unit = units
            .into_iter()
            .map(|(unit, (flows, total_amount))| UnitTotal {
                unit: unit.to_string(),
                flows,
                total_amount,
            })
            .collect();
        summary.by_category = categories
            .into_iter()
            .map(|((category, unit), (flows, total_amount))| CategoryTotal {
                category: category.to_string(),
                unit: unit.to_string(),
                flows,
                total_amount,
            })
            .collect();
        summary
    }
}
