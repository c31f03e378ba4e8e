use super::{FloatT, MultiplyError, MultiplySettings};

// All internal math for the matrix types goes through these core
// traits, which are implemented generically for floats of type FloatT.

/// Vector operations on slices of [`FloatT`](crate::algebra::FloatT)

pub trait VectorMath {
    type T;

    /// Apply an elementwise operation on a vector.
    fn scalarop(&mut self, op: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// set all elements to the same value
    fn set(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise scaling.
    ///
    /// Always multiplies, so that a scaling by zero still propagates
    /// infinities and NaNs already present in `self`.
    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise negation of entries.
    fn negate(&mut self) -> &mut Self;

    /// Infinity norm
    fn norm_inf(&self) -> Self::T;

    /// Max absolute difference between `self` and `b`
    fn norm_inf_diff(&self, b: &Self) -> Self::T;

    /// Checks if all elements are finite, i.e. no Infs or NaNs
    fn is_finite(&self) -> bool;

    /// BLAS-like shift and scale in place.  Produces `self = a*x+b*self`
    fn axpby(&mut self, a: Self::T, x: &Self, b: Self::T) -> &mut Self;
}

/// Operations on matrices of [`FloatT`](crate::algebra::FloatT)

pub trait MatrixMath {
    type T: FloatT;

    /// Elementwise scaling
    fn scale(&mut self, c: Self::T);

    /// Elementwise negation
    fn negate(&mut self);

    /// Largest absolute value of any entry
    fn norm_inf(&self) -> Self::T;
}

/// Matrix-vector products for matrices of [`FloatT`](crate::algebra::FloatT)

pub trait MatrixVectorMultiply {
    type T: FloatT;

    /// BLAS-like general matrix-vector multiply.  Produces `y = a*self*x + b*y`
    fn gemv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// Dense reference matrix-matrix product

pub trait MultiplyGEMM {
    type T: FloatT;

    /// BLAS-like general matrix multiply.  Produces `self = α*A*B + β*self`
    ///
    /// # Panics
    /// Panics if the dimensions of `A`, `B` and `self` are incompatible.
    fn mul<MATA, MATB>(&mut self, A: &MATA, B: &MATB, α: Self::T, β: Self::T) -> &Self
    where
        MATA: super::DenseMatrix<Self::T>,
        MATB: super::DenseMatrix<Self::T>;
}

/// Scaled accumulation of a matrix product into `self`.
///
/// Implemented on the destination type for each supported operand
/// combination with at least one diagonal-storage operand:
///
/// | `self`           | `A`              | `B`              |
/// |------------------|------------------|------------------|
/// | `Matrix`         | `DiagonalMatrix` | `Matrix`         |
/// | `Matrix`         | `Matrix`         | `DiagonalMatrix` |
/// | `DiagonalMatrix` | `DiagonalMatrix` | `DiagonalMatrix` |
/// | `Matrix`         | `DiagonalMatrix` | `DiagonalMatrix` |
///
/// All of them produce `self = β*self + α*A*B`.  Dimensions are checked
/// before `self` is touched; on failure `self` is left unmodified.

pub trait MultiplyAccumulate<MATA, MATB> {
    type T: FloatT;

    /// Scaled accumulation using explicit [`MultiplySettings`](crate::algebra::MultiplySettings)
    fn mul_accumulate_with(
        &mut self,
        A: &MATA,
        B: &MATB,
        α: Self::T,
        β: Self::T,
        settings: &MultiplySettings,
    ) -> Result<&mut Self, MultiplyError>;

    /// Scaled accumulation with default settings, running on the
    /// current (or global) rayon pool.
    fn mul_accumulate(
        &mut self,
        A: &MATA,
        B: &MATB,
        α: Self::T,
        β: Self::T,
    ) -> Result<&mut Self, MultiplyError> {
        self.mul_accumulate_with(A, B, α, β, &MultiplySettings::default())
    }
}
