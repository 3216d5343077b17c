//! Flow table transformations for the LCA pipeline.
//!
//! - **units**: unit vocabulary and the direct conversion-factor table
//! - **conversion**: raw simulation units to LCA units
//! - **normalization**: rescaling to the functional unit
//! - **merge**: folding component flows and consolidating duplicates

pub mod conversion;
pub mod error;
pub mod merge;
pub mod normalization;
pub mod units;

pub use conversion::{convert, convert_quantity, is_rate_unit, target_unit_for};
pub use error::{ConversionError, MergeError, NormalizationError};
pub use merge::{apply_merge_rules, consolidate_duplicates, merge_flows};
pub use normalization::normalize;
pub use units::{ConversionFactorTable, UnitDimension, UnitPair, canonical_unit};
