//! Flow registry collaborators.
//!
//! The resolver only needs `(name, role) -> identifier`. [`InMemoryRegistry`]
//! answers that from a list of entries (typically a CSV export of the LCA
//! database's flow list) and adds the keyword search and fuzzy suggestions
//! used when a flow is missing.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::Read;

use csv::StringRecord;
use rapidfuzz::distance::jaro_winkler;
use serde::Deserialize;
use tracing::debug;

use lca_model::{FlowIdentifier, FlowRole};

use crate::error::RegistryError;

/// Minimum Jaro-Winkler similarity for a registry name to be suggested.
pub const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Maximum number of suggestions per unmatched flow.
pub const MAX_SUGGESTIONS: usize = 3;

/// Separator of the `aliases` column in registry CSV files.
pub const ALIAS_SEPARATOR: char = '|';

/// A registry hit for one flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryMatch {
    pub identifier: FlowIdentifier,
    pub category: Option<String>,
}

/// Lookup side of the external flow registry.
pub trait FlowRegistry {
    fn lookup(&self, flow_name: &str, role: FlowRole) -> Option<RegistryMatch>;

    /// Names close to `flow_name`, best first. Defaults to none.
    fn suggest(&self, _flow_name: &str, _role: FlowRole) -> Vec<String> {
        Vec::new()
    }
}

impl<F> FlowRegistry for F
where
    F: Fn(&str, FlowRole) -> Option<RegistryMatch>,
{
    fn lookup(&self, flow_name: &str, role: FlowRole) -> Option<RegistryMatch> {
        self(flow_name, role)
    }
}

/// One flow known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub identifier: FlowIdentifier,
    pub name: String,
    pub role: FlowRole,
    pub category: Option<String>,
    /// Simulation spellings that refer to the same flow.
    pub aliases: Vec<String>,
}

impl RegistryEntry {
    pub fn new(identifier: FlowIdentifier, name: impl Into<String>, role: FlowRole) -> Self {
        Self {
            identifier,
            name: name.into(),
            role,
            category: None,
            aliases: Vec::new(),
        }
    }

    /// Entry whose identifier is derived from name and role.
    pub fn derived(name: impl Into<String>, role: FlowRole) -> Self {
        let name = name.into();
        Self::new(FlowIdentifier::derive(&name, role), name, role)
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    fn to_match(&self) -> RegistryMatch {
        RegistryMatch {
            identifier: self.identifier.clone(),
            category: self.category.clone(),
        }
    }
}

fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Registry held in memory, matched case-insensitively on name or alias.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    entries: Vec<RegistryEntry>,
    index: BTreeMap<(String, FlowRole), usize>,
}

impl InMemoryRegistry {
    /// Indexes `entries`; a name or alias may only point at one identifier
    /// per role.
    pub fn new(entries: Vec<RegistryEntry>) -> Result<Self, RegistryError> {
        let mut index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            let names = std::iter::once(&entry.name).chain(entry.aliases.iter());
            for name in names {
                let key = (lookup_key(name), entry.role);
                if let Some(&existing) = index.get(&key) {
                    let existing: &RegistryEntry = &entries[existing];
                    if existing.identifier != entry.identifier {
                        return Err(RegistryError::ConflictingEntry {
                            name: name.clone(),
                            role: entry.role.to_string(),
                        });
                    }
                    continue;
                }
                index.insert(key, position);
            }
        }
        Ok(Self { entries, index })
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive keyword search over entry names and aliases.
    ///
    /// Exact matches come first, then names starting with the keywords, then
    /// names containing them; an entry ranks by its best-matching spelling
    /// and ties are ordered by name.
    pub fn search(&self, keywords: &str) -> Vec<&RegistryEntry> {
        let needle = lookup_key(keywords);
        if needle.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<(u8, String, &RegistryEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let rank = std::iter::once(&entry.name)
                    .chain(entry.aliases.iter())
                    .filter_map(|spelling| search_rank(&spelling.to_lowercase(), &needle))
                    .min()?;
                Some((rank, entry.name.to_lowercase(), entry))
            })
            .collect();
        hits.sort_by(|left, right| (left.0, &left.1).cmp(&(right.0, &right.1)));
        debug!(keywords, hits = hits.len(), "registry search");
        hits.into_iter().map(|(_, _, entry)| entry).collect()
    }
}

fn search_rank(spelling: &str, needle: &str) -> Option<u8> {
    if spelling == needle {
        Some(0)
    } else if spelling.starts_with(needle) {
        Some(1)
    } else if spelling.contains(needle) {
        Some(2)
    } else {
        None
    }
}

impl FlowRegistry for InMemoryRegistry {
    fn lookup(&self, flow_name: &str, role: FlowRole) -> Option<RegistryMatch> {
        self.index
            .get(&(lookup_key(flow_name), role))
            .map(|&position| self.entries[position].to_match())
    }

    /// Registry names of the same role with Jaro-Winkler similarity above
    /// [`SUGGESTION_THRESHOLD`].
    fn suggest(&self, flow_name: &str, role: FlowRole) -> Vec<String> {
        let needle = lookup_key(flow_name);
        let mut scored: Vec<(f64, &str)> = self
            .entries
            .iter()
            .filter(|entry| entry.role == role)
            .map(|entry| {
                let score = jaro_winkler::similarity(
                    needle.chars(),
                    entry.name.to_lowercase().chars(),
                );
                (score, entry.name.as_str())
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|left, right| {
            right
                .0
                .partial_cmp(&left.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| left.1.cmp(right.1))
        });
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RegistryRow {
    identifier: String,
    name: String,
    role: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    aliases: String,
}

/// Reads registry entries from CSV with columns
/// `identifier,name,role,category,aliases`.
///
/// `category` and `aliases` may be empty; aliases are separated by `|`.
pub fn read_registry<R: Read>(reader: R) -> Result<Vec<RegistryEntry>, RegistryError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|header| header.trim_matches('\u{feff}'))
        .collect();
    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: RegistryRow = record.deserialize(Some(&headers))?;
        let identifier = FlowIdentifier::new(row.identifier).map_err(|error| {
            RegistryError::InvalidEntry {
                line,
                message: error.to_string(),
            }
        })?;
        let role: FlowRole = row.role.parse().map_err(|error: lca_model::ModelError| {
            RegistryError::InvalidEntry {
                line,
                message: error.to_string(),
            }
        })?;
        if row.name.is_empty() {
            return Err(RegistryError::InvalidEntry {
                line,
                message: "empty flow name".to_string(),
            });
        }
        entries.push(RegistryEntry {
            identifier,
            name: row.name,
            role,
            category: Some(row.category).filter(|category| !category.is_empty()),
            aliases: row
                .aliases
                .split(ALIAS_SEPARATOR)
                .map(str::trim)
                .filter(|alias| !alias.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::new(vec![
            RegistryEntry::derived("Sulfuric acid", FlowRole::Elementary)
                .with_alias("H2SO4")
                .with_category("Elementary flows/Emission to water"),
            RegistryEntry::derived("Sulfuric acid production", FlowRole::Product),
            RegistryEntry::derived("Sodium hydroxide", FlowRole::Product).with_alias("NaOH"),
            RegistryEntry::derived("Acid, sulfuric", FlowRole::Product),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_matches_alias_case_insensitively() {
        let registry = registry();
        let hit = registry.lookup(" h2so4 ", FlowRole::Elementary).unwrap();
        assert_eq!(
            hit.identifier,
            FlowIdentifier::derive("Sulfuric acid", FlowRole::Elementary)
        );
        assert_eq!(
            hit.category.as_deref(),
            Some("Elementary flows/Emission to water")
        );
    }

    #[test]
    fn lookup_respects_role() {
        assert!(registry().lookup("NaOH", FlowRole::Waste).is_none());
    }

    #[test]
    fn search_orders_exact_prefix_contains() {
        let registry = registry();
        let names: Vec<&str> = registry
            .search("SULFURIC ACID")
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["Sulfuric acid", "Sulfuric acid production"]);

        let names: Vec<&str> = registry
            .search("sulfuric")
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Sulfuric acid", "Sulfuric acid production", "Acid, sulfuric"]
        );
    }

    #[test]
    fn search_matches_aliases() {
        let registry = registry();
        let names: Vec<&str> = registry
            .search("h2so4")
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["Sulfuric acid"]);

        let names: Vec<&str> = registry
            .search("NaO")
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["Sodium hydroxide"]);
    }

    #[test]
    fn suggest_finds_close_names() {
        let suggestions = registry().suggest("Sodium hydroxid", FlowRole::Product);
        assert_eq!(suggestions, vec!["Sodium hydroxide".to_string()]);
        assert!(registry().suggest("Kerosene", FlowRole::Product).is_empty());
    }

    #[test]
    fn conflicting_alias_is_rejected() {
        let err = InMemoryRegistry::new(vec![
            RegistryEntry::derived("Water", FlowRole::Product),
            RegistryEntry::derived("Process water", FlowRole::Product).with_alias("water"),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::ConflictingEntry { .. }));
    }

    #[test]
    fn reads_csv_rows() {
        let text = "identifier,name,role,category,aliases\n\
            a1,Sulfuric acid,elementary,Emission to water,H2SO4|sulphuric acid\n\
            b2,Kerosene,PRODUCT,,\n";
        let entries = read_registry(text.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].aliases, vec!["H2SO4", "sulphuric acid"]);
        assert_eq!(entries[1].role, FlowRole::Product);
        assert_eq!(entries[1].category, None);
    }

    #[test]
    fn csv_row_with_unknown_role_names_line() {
        let text = "identifier,name,role,category,aliases\nx,Water,steam,,\n";
        let err = read_registry(text.as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidEntry { line: 2, .. }));
    }

    #[test]
    fn line_numbers_follow_multiline_fields() {
        let text = "identifier,name,role,category,aliases\n\
            a1,Sulfuric acid,elementary,\"Emission\nto water\",\n\
            b2,,product,,\n";
        let err = read_registry(text.as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidEntry { line: 4, .. }));
    }
}
