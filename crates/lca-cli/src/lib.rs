//! Library side of the `lca-flows` command-line driver.

#![allow(missing_docs)]

pub mod logging;
pub mod pipeline;
