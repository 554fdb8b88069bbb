//! Numerical routines: least squares, ridge regression and gradient descent.

pub mod gradient;
pub mod ols;
pub mod ridge;

pub use gradient::*;
pub use ols::*;
pub use ridge::*;
