use num_traits::{Float, FloatConst, FromPrimitive, NumAssign, NumCast};
use std::fmt::{Debug, Display, LowerExp};

/// Main trait for floating point types stored in diagonal and dense matrices.
///
/// Implementations are provided for f32 and f64 through the blanket
/// implementation below.  Any other type satisfying the bounds may also be
/// used.  `Send + Sync` are required by the parallel multiply kernels.
///
/// `FloatT` relies on [`num_traits`](num_traits) for most of its constituent trait bounds.
pub trait FloatT:
    'static
    + Send
    + Sync
    + Float
    + FloatConst
    + NumAssign
    + NumCast
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> FloatT for T where
    T: 'static
        + Send
        + Sync
        + Float
        + FloatConst
        + NumAssign
        + NumCast
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}
