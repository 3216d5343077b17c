//! Input loading for the LCA flow pipeline.
//!
//! Configuration (TOML), extra conversion factors (CSV), flowsheet
//! recordings (TOML) and previously written stage tables (CSV).

pub mod config;
pub mod error;
pub mod recording;
pub mod tables;

pub use config::{build_factor_table, load_config, read_conversion_factors};
pub use error::{IngestError, Result};
pub use recording::load_recorded_flowsheet;
pub use tables::{
    BASE_COLUMNS, read_converted_table, read_finalized_table, read_normalized_table,
    read_raw_table,
};
