use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference quantity that all flows of a run are expressed against.
///
/// Without a `reference_flow` the FU is absolute: every quantity is divided by
/// `value`. With one, the FU reads "`value` `unit` of `reference_flow`" and
/// quantities are scaled by how many FUs of that flow the run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalUnit {
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_flow: Option<String>,
}

impl FunctionalUnit {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            reference_flow: None,
        }
    }

    /// Declares the FU on a named reference flow, e.g. 1 kg of product.
    #[must_use]
    pub fn of_flow(mut self, flow_name: impl Into<String>) -> Self {
        self.reference_flow = Some(flow_name.into());
        self
    }

    /// True when `value` is a finite, strictly positive number.
    pub fn is_valid(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

impl Default for FunctionalUnit {
    fn default() -> Self {
        Self::new(1.0, "kg")
    }
}

impl fmt::Display for FunctionalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reference_flow {
            Some(flow) => write!(f, "{} {} of {}", self.value, self.unit, flow),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_requires_positive_finite_value() {
        assert!(FunctionalUnit::new(1.0, "kg").is_valid());
        assert!(!FunctionalUnit::new(0.0, "kg").is_valid());
        assert!(!FunctionalUnit::new(-2.0, "kg").is_valid());
        assert!(!FunctionalUnit::new(f64::NAN, "kg").is_valid());
        assert!(!FunctionalUnit::new(f64::INFINITY, "kg").is_valid());
    }

    #[test]
    fn display_names_reference_flow() {
        let fu = FunctionalUnit::new(1.0, "kg").of_flow("REO_product");
        assert_eq!(fu.to_string(), "1 kg of REO_product");
    }
}
