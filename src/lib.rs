//! `poly-ridge` library crate.
//!
//! The binary (`polyridge`) is a thin wrapper around this library so that:
//!
//! - fitting logic is testable without spawning processes
//! - the ridge solver, loaders and plotters are reusable on their own

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod features;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
