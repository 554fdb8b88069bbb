//! Input helpers: CSV ingest + type coercion (`ingest`).

pub mod ingest;

pub use ingest::*;
