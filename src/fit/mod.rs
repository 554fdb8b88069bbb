//! Model fitting orchestration.
//!
//! Responsibilities:
//!
//! - polynomial ridge fit with optional validation scoring (`poly_fit`)
//! - the same fit repeated over independent subsets (`subsets`)

pub mod poly_fit;
pub mod subsets;

pub use poly_fit::*;
pub use subsets::*;
