use super::core::{convert_value, diagonal_id, diagonal_offset};
use crate::algebra::*;
use num_traits::ToPrimitive;

impl<T> DiagonalMatrix<T>
where
    T: FloatT,
{
    /// Returns the value at `(i, j)`.
    ///
    /// Elements not on a stored diagonal are zero.
    ///
    /// # Errors
    /// Fails with [`DiagonalMatrixError::OutOfBounds`] if `(i, j)` is not
    /// inside the matrix.
    pub fn get(&self, i: usize, j: usize) -> Result<T, DiagonalMatrixError> {
        self.check_bounds(i, j)?;
        Ok(self.value(i, j))
    }

    /// Assigns `value` to the element at `(i, j)`.
    ///
    /// If `(i, j)` is not on a stored diagonal, its diagonal is first
    /// inserted, zero filled, at its sorted position.
    ///
    /// # Errors
    /// Fails with [`DiagonalMatrixError::OutOfBounds`] if `(i, j)` is not
    /// inside the matrix.
    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<(), DiagonalMatrixError> {
        self.check_bounds(i, j)?;
        *self.entry_mut(i, j) = value;
        Ok(())
    }

    /// Adds `value` to the element at `(i, j)`, creating its diagonal
    /// if needed.
    ///
    /// # Errors
    /// Fails with [`DiagonalMatrixError::OutOfBounds`] if `(i, j)` is not
    /// inside the matrix.
    pub fn add_to(&mut self, i: usize, j: usize, value: T) -> Result<(), DiagonalMatrixError> {
        self.check_bounds(i, j)?;
        *self.entry_mut(i, j) += value;
        Ok(())
    }

    /// As [`set`](DiagonalMatrix::set), converting `value` to `T`.
    ///
    /// # Errors
    /// Fails with [`DiagonalMatrixError::Conversion`] if `value` is finite
    /// but outside the range of `T`.  The matrix is unchanged on failure.
    pub fn set_from<V>(&mut self, i: usize, j: usize, value: V) -> Result<(), DiagonalMatrixError>
    where
        V: ToPrimitive,
    {
        let value = convert_value(&value).ok_or(DiagonalMatrixError::Conversion)?;
        self.set(i, j, value)
    }

    fn check_bounds(&self, i: usize, j: usize) -> Result<(), DiagonalMatrixError> {
        if i >= self.m || j >= self.n {
            Err(DiagonalMatrixError::OutOfBounds {
                row: i,
                col: j,
                nrows: self.m,
                ncols: self.n,
            })
        } else {
            Ok(())
        }
    }

    // value at an in-bounds (i, j)
    #[inline]
    pub(crate) fn value(&self, i: usize, j: usize) -> T {
        match self.find(diagonal_id(self.m, i, j)) {
            Ok(pos) => self.diagvals[pos][diagonal_offset(i, j)],
            Err(_) => T::zero(),
        }
    }

    // storage for an in-bounds (i, j), creating its diagonal if needed
    #[inline]
    pub(crate) fn entry_mut(&mut self, i: usize, j: usize) -> &mut T {
        let pos = self.find_or_insert(diagonal_id(self.m, i, j));
        &mut self.diagvals[pos][diagonal_offset(i, j)]
    }
}

#[test]
fn test_get_set_5x5() {
    let mut A = DiagonalMatrix::<f64>::new(5, 5);
    A.set(0, 0, 2.0).unwrap();
    A.set(3, 0, 0.0).unwrap();
    A.set(0, 2, 5.0).unwrap();

    assert_eq!(A.get(0, 0), Ok(2.0));
    assert_eq!(A.get(3, 0), Ok(0.0));
    assert_eq!(A.get(0, 2), Ok(5.0));
    assert_eq!(A.size(), (5, 5));

    // diagonals inserted in sorted order, each at full length
    assert_eq!(A.diagonal_ids(), &[2, 5, 7]);
    assert_eq!(A.diagonal(2), Some(&[0.0, 0.0][..]));
    assert_eq!(A.diagonal(7), Some(&[5.0, 0.0, 0.0][..]));
    assert_eq!(A.nnz(), 10);

    // unset entries read as zero, on stored diagonals or not
    assert_eq!(A.get(4, 1), Ok(0.0));
    assert_eq!(A.get(1, 3), Ok(0.0));
    assert_eq!(A.get(4, 4), Ok(0.0));
}

#[test]
fn test_get_set_out_of_bounds() {
    let mut A = DiagonalMatrix::<f64>::new(3, 4);
    let err = DiagonalMatrixError::OutOfBounds {
        row: 3,
        col: 0,
        nrows: 3,
        ncols: 4,
    };
    assert_eq!(A.get(3, 0), Err(err.clone()));
    assert_eq!(A.set(3, 0, 1.0), Err(err));
    assert!(A.set(0, 4, 1.0).is_err());
    assert!(A.add_to(0, 4, 1.0).is_err());

    // nothing created by the failed calls
    assert_eq!(A.ndiagonals(), 0);
}

#[test]
fn test_add_to_and_set_from() {
    let mut A = DiagonalMatrix::<f32>::new(2, 3);
    A.add_to(1, 2, 1.5).unwrap();
    A.add_to(1, 2, 1.5).unwrap();
    assert_eq!(A.get(1, 2), Ok(3.0));

    A.set_from(0, 0, 7u8).unwrap();
    assert_eq!(A.get(0, 0), Ok(7.0));
    assert_eq!(
        A.set_from(0, 1, 1e200f64),
        Err(DiagonalMatrixError::Conversion)
    );
    assert_eq!(A.get(0, 1), Ok(0.0));
    assert_eq!(A.ndiagonals(), 2);
}
