//! Feature construction: design matrices (`design`) and polynomial expansion (`poly`).

pub mod design;
pub mod poly;

pub use design::*;
pub use poly::*;
