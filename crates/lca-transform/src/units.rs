//! Unit vocabulary and the conversion-factor table.
//!
//! The table stores one direct multiplicative factor per (source, target)
//! pair. Lookups never chain factors through intermediate units, so every
//! conversion is a single multiplication regardless of how many units the
//! table knows about.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use lca_model::units::{RATE_SUFFIX, canonical_unit};

use crate::error::ConversionError;

/// Physical dimension of a unit, used to pick the conversion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitDimension {
    Mass,
    Energy,
    Volume,
    /// Mass of a substance per mass of its carrier.
    Concentration,
}

/// Mass units relative to kg.
const MASS_UNITS: &[(&str, f64)] = &[("mg", 1e-6), ("g", 1e-3), ("kg", 1.0), ("t", 1e3)];

/// Energy units relative to MJ.
const ENERGY_UNITS: &[(&str, f64)] = &[
    ("J", 1e-6),
    ("kJ", 1e-3),
    ("MJ", 1.0),
    ("GJ", 1e3),
    ("Wh", 3.6e-3),
    ("kWh", 3.6),
    ("MWh", 3600.0),
];

/// Volume units relative to L.
const VOLUME_UNITS: &[(&str, f64)] = &[("mL", 1e-3), ("L", 1.0), ("m3", 1e3)];

/// Mass-ratio units relative to kg/kg.
const CONCENTRATION_UNITS: &[(&str, f64)] = &[
    ("kg/kg", 1.0),
    ("mass fraction", 1.0),
    ("%", 1e-2),
    ("g/kg", 1e-3),
    ("mg/kg", 1e-6),
    ("ppm", 1e-6),
    ("ppb", 1e-9),
];

/// Power units and the energy unit they integrate to over one hour.
const POWER_UNITS: &[(&str, &str)] = &[("W", "Wh"), ("kW", "kWh"), ("MW", "MWh")];

/// Units that have a dimension but no built-in factor.
const UNFACTORED_MASS_UNITS: &[&str] = &["lb", "oz", "ton"];

impl UnitDimension {
    /// Classifies a unit (rates included); `None` for units outside the vocabulary.
    pub fn of(unit: &str) -> Option<Self> {
        let canonical = canonical_unit(unit);
        let base = canonical
            .strip_suffix(RATE_SUFFIX)
            .unwrap_or(canonical.as_str());
        if MASS_UNITS.iter().any(|(name, _)| *name == base)
            || UNFACTORED_MASS_UNITS.contains(&base)
        {
            Some(UnitDimension::Mass)
        } else if ENERGY_UNITS.iter().any(|(name, _)| *name == base)
            || POWER_UNITS.iter().any(|(name, _)| *name == base)
        {
            Some(UnitDimension::Energy)
        } else if VOLUME_UNITS.iter().any(|(name, _)| *name == base) {
            Some(UnitDimension::Volume)
        } else if CONCENTRATION_UNITS.iter().any(|(name, _)| *name == base) {
            Some(UnitDimension::Concentration)
        } else {
            None
        }
    }
}

/// An ordered (source, target) unit pair.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UnitPair {
    pub source: String,
    pub target: String,
}

impl UnitPair {
    /// Builds a pair from canonicalized unit spellings.
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: canonical_unit(source),
            target: canonical_unit(target),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for UnitPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// Direct conversion factors keyed by unit pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionFactorTable {
    factors: BTreeMap<UnitPair, f64>,
}

impl ConversionFactorTable {
    /// An empty table; only identity conversions succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factors between all mass, energy, volume and concentration units of
    /// the vocabulary.
    ///
    /// Imperial units are absent: a flowsheet reporting `lb`
    /// needs an explicit factor from the configuration.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for units in [MASS_UNITS, ENERGY_UNITS, VOLUME_UNITS, CONCENTRATION_UNITS] {
            for (source, source_base) in units {
                for (target, target_base) in units {
                    if source != target {
                        table
                            .factors
                            .insert(UnitPair::new(source, target), source_base / target_base);
                    }
                }
            }
        }
        table
    }

    /// Adds rate-to-amount factors for an operating horizon of `hours`.
    ///
    /// For every amount factor `u -> v` (identities included) the table gains
    /// `u/hr -> v = factor * hours`; power units integrate to energy
    /// (`kW -> MJ = 3.6 * hours`). Existing entries are kept.
    pub fn with_operating_hours(mut self, hours: f64) -> Result<Self, ConversionError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(ConversionError::InvalidOperatingHours(hours));
        }
        let mut rates = Vec::new();
        for units in [MASS_UNITS, ENERGY_UNITS, VOLUME_UNITS] {
            for (source, _) in units {
                for (target, _) in units {
                    let amount = UnitPair::new(source, target);
                    let factor = if amount.is_identity() {
                        1.0
                    } else if let Some(factor) = self.lookup(&amount) {
                        factor
                    } else {
                        continue;
                    };
                    rates.push((
                        UnitPair::new(&format!("{source}{RATE_SUFFIX}"), target),
                        factor * hours,
                    ));
                }
            }
        }
        for (power, energy) in POWER_UNITS {
            for (target, _) in ENERGY_UNITS {
                let amount = UnitPair::new(energy, target);
                let factor = if amount.is_identity() {
                    Some(1.0)
                } else {
                    self.lookup(&amount)
                };
                if let Some(factor) = factor {
                    rates.push((UnitPair::new(power, target), factor * hours));
                }
            }
        }
        for (pair, factor) in rates {
            self.factors.entry(pair).or_insert(factor);
        }
        Ok(self)
    }

    /// Inserts or replaces a factor, returning the previous one.
    pub fn insert(
        &mut self,
        source: &str,
        target: &str,
        factor: f64,
    ) -> Result<Option<f64>, ConversionError> {
        let pair = UnitPair::new(source, target);
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConversionError::InvalidFactor { pair, factor });
        }
        Ok(self.factors.insert(pair, factor))
    }

    /// Stored factor for a pair; identity pairs are not stored.
    pub fn lookup(&self, pair: &UnitPair) -> Option<f64> {
        self.factors.get(pair).copied()
    }

    /// Factor for `source -> target`, with 1.0 for identical units.
    pub fn factor(&self, source: &str, target: &str) -> Result<f64, ConversionError> {
        let pair = UnitPair::new(source, target);
        if pair.is_identity() {
            return Ok(1.0);
        }
        self.lookup(&pair)
            .ok_or(ConversionError::UnknownUnit { pair, flow_name: None })
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Iterates factors in unit-pair order.
    pub fn iter(&self) -> impl Iterator<Item = (&UnitPair, f64)> {
        self.factors.iter().map(|(pair, factor)| (pair, *factor))
    }
}
