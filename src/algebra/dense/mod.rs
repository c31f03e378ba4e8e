mod core;
pub(crate) use self::core::display_matrix;
mod gemm;
mod matrix_math;
mod types;
pub use self::types::*;
