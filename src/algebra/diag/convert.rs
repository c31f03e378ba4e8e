use super::core::{convert_values, diagonal_coords};
use crate::algebra::*;

impl<T> DiagonalMatrix<T>
where
    T: FloatT,
{
    /// Fully materialized dense copy of `self`.
    pub fn to_dense(&self) -> Matrix<T> {
        let mut M = Matrix::zeros(self.size());
        for j in 0..self.n {
            for i in 0..self.m {
                M[(i, j)] = self.value(i, j);
            }
        }
        M
    }

    /// Builds a diagonal matrix from the diagonals of a dense matrix.
    ///
    /// With `dropzeros` set, only diagonals containing at least one
    /// nonzero are stored.  Otherwise every diagonal is stored.
    pub fn from_dense<MAT>(M: &MAT, dropzeros: bool) -> Self
    where
        MAT: DenseMatrix<T>,
    {
        let (m, n) = M.size();
        let mut A = Self::new(m, n);
        for id in 1..=A.max_diagonal_id() {
            let vals: Vec<T> = (0..A.diagonal_len(id))
                .map(|p| M[diagonal_coords(m, id, p)])
                .collect();
            if !dropzeros || vals.iter().any(|v| !v.is_zero()) {
                A.diagids.push(id);
                A.diagvals.push(vals);
            }
        }
        A
    }

    /// Transpose, as a new matrix.
    ///
    /// Diagonal `k` of an `m x n` matrix becomes diagonal `m + n - k` of
    /// its `n x m` transpose, with the same values in the same order.
    pub fn transpose(&self) -> Self {
        let (diagids, diagvals) = self
            .iter()
            .rev()
            .map(|(id, v)| (self.m + self.n - id, v.to_vec()))
            .unzip();
        Self {
            m: self.n,
            n: self.m,
            diagids,
            diagvals,
        }
    }

    /// Copy of `self` with elements converted to another float type.
    ///
    /// # Errors
    /// Fails with [`DiagonalMatrixError::Conversion`] if any finite value
    /// is outside the range of `U`.
    pub fn convert<U>(&self) -> Result<DiagonalMatrix<U>, DiagonalMatrixError>
    where
        U: FloatT,
    {
        let diagvals = self
            .diagvals
            .iter()
            .map(|v| convert_values(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DiagonalMatrix {
            m: self.m,
            n: self.n,
            diagids: self.diagids.clone(),
            diagvals,
        })
    }
}

impl<T> From<&DiagonalMatrix<T>> for Matrix<T>
where
    T: FloatT,
{
    fn from(A: &DiagonalMatrix<T>) -> Self {
        A.to_dense()
    }
}

#[test]
fn test_to_dense() {
    // A =
    //[ 1.0   ⋅    ⋅   7.0]
    //[  ⋅   2.0   ⋅    ⋅ ]
    //[ 5.0   ⋅   3.0   ⋅ ]
    //[  ⋅   6.0   ⋅   4.0]
    let A = DiagonalMatrix::from_diagonals(
        vec![7, 4, 2],
        vec![vec![7.], vec![1., 2., 3., 4.], vec![5., 6.]],
        4,
        4,
    )
    .unwrap();

    let D = Matrix::from(&[
        [1., 0., 0., 7.],
        [0., 2., 0., 0.],
        [5., 0., 3., 0.],
        [0., 6., 0., 4.],
    ]);
    assert_eq!(A.to_dense(), D);
    assert_eq!(Matrix::from(&A), D);

    // and back again
    let B = DiagonalMatrix::from_dense(&D, true);
    assert_eq!(B, A);
    let C = DiagonalMatrix::from_dense(&D, false);
    assert_eq!(C.ndiagonals(), 7);
    assert_eq!(C.nnz(), 16);
    assert_eq!(C.to_dense(), D);
}

#[test]
fn test_transpose_rectangular() {
    // 2 x 3
    //[ 1.0  2.0   ⋅ ]
    //[  ⋅   3.0  4.0]
    let mut A = DiagonalMatrix::<f64>::new(2, 3);
    A.set(0, 0, 1.0).unwrap();
    A.set(0, 1, 2.0).unwrap();
    A.set(1, 1, 3.0).unwrap();
    A.set(1, 2, 4.0).unwrap();

    let At = A.transpose();
    assert_eq!(At.size(), (3, 2));
    assert!(At.check_format().is_ok());
    for i in 0..2 {
        for j in 0..3 {
            assert_eq!(At.get(j, i), A.get(i, j));
        }
    }
    assert_eq!(At.transpose(), A);
}

#[test]
fn test_convert() {
    let A = DiagonalMatrix::<f64>::identity(3);
    let B: DiagonalMatrix<f32> = A.convert().unwrap();
    assert_eq!(B.diagonal(3), Some(&[1.0f32; 3][..]));

    let mut C = DiagonalMatrix::<f64>::new(2, 2);
    C.set(1, 0, f64::MAX).unwrap();
    assert_eq!(
        C.convert::<f32>(),
        Err(DiagonalMatrixError::Conversion)
    );
}
