//! Diagonal-storage and dense matrix types, and the math on them.
//!
//! All of the numerical kernels in this crate are implemented generically
//! over floats implementing [`FloatT`](crate::algebra::FloatT).  The main
//! storage type is [`DiagonalMatrix`](crate::algebra::DiagonalMatrix); the
//! column-major [`Matrix`](crate::algebra::Matrix) type is provided for dense
//! operands of the multiply kernels and for dense conversion.

#![allow(non_snake_case)]

mod error_types;
mod floats;
mod math_traits;
mod matrix_traits;
mod matrix_types;
mod parallel;
mod settings;
mod vecmath;

pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_traits::*;
pub use matrix_types::*;
pub use settings::*;

mod dense;
pub use dense::*;
mod diag;
pub use diag::*;
