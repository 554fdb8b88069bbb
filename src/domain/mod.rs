//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - column schemas and typed cells (`Schema`, `ColumnType`, `Value`)
//! - the in-memory record table (`RecordTable`)
//! - fit outputs (`PolyFit`, `GradientDescentFit`, `SubsetReport`) and plot inputs

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
