use super::core::convert_values;
use crate::algebra::*;
use num_traits::ToPrimitive;

impl<T> DiagonalMatrix<T>
where
    T: FloatT,
{
    /// Assigns a whole diagonal at once, returning `values` unchanged.
    ///
    /// __The target diagonal is determined only by `values.len()` and
    /// `lower`__, never by an explicit offset:
    ///
    /// ```text
    /// id = values.len()            if lower
    /// id = 2 * m - values.len()    otherwise
    /// ```
    ///
    /// For a square matrix this selects the sub-diagonal (`lower`) or
    /// super-diagonal whose length is `values.len()`, with a full length
    /// vector selecting the main diagonal either way.  For rectangular
    /// matrices the formula is applied as written, so the chosen diagonal
    /// need not have length `values.len()`; only that many leading entries
    /// are then written.  Two calls with equal length vectors and equal
    /// `lower` flags always target the same diagonal.
    ///
    /// If the diagonal is not yet stored it is created from the converted
    /// values, otherwise its first `values.len()` entries are overwritten.
    ///
    /// # Errors
    /// - [`DiagonalMatrixError::DiagonalTooLong`] if `values.len() > m`
    /// - [`DiagonalMatrixError::InvalidDiagonal`] if the computed id is not a
    ///   diagonal of the matrix, or the diagonal is shorter than `values`
    /// - [`DiagonalMatrixError::Conversion`] if a value can not be
    ///   represented as `T`
    ///
    /// The matrix is unchanged on any error.
    ///
    /// ```no_run
    /// use diagmat::algebra::*;
    ///
    /// let mut A = DiagonalMatrix::<f64>::new(4, 4);
    /// A.setdiagonal(&[1, 2], true).unwrap(); // id 2: (2,0), (3,1)
    /// A.setdiagonal(&[3, 4], false).unwrap(); // id 6: (0,2), (1,3)
    /// assert_eq!(A.get(3, 1), Ok(2.0));
    /// assert_eq!(A.get(1, 3), Ok(4.0));
    /// ```
    pub fn setdiagonal<'a, V>(
        &mut self,
        values: &'a [V],
        lower: bool,
    ) -> Result<&'a [V], DiagonalMatrixError>
    where
        V: ToPrimitive,
    {
        let len = values.len();
        if len > self.m {
            return Err(DiagonalMatrixError::DiagonalTooLong { len, nrows: self.m });
        }

        let id = if lower { len } else { 2 * self.m - len };
        let max = self.max_diagonal_id();
        if id == 0 || id > max || self.diagonal_len(id) < len {
            return Err(DiagonalMatrixError::InvalidDiagonal { id, max });
        }

        let mut converted = convert_values::<V, T>(values)?;

        match self.find(id) {
            Ok(pos) => {
                self.diagvals[pos][..len].copy_from_slice(&converted);
            }
            Err(pos) => {
                converted.resize(self.diagonal_len(id), T::zero());
                self.insert_diagonal(pos, id, converted);
            }
        }
        Ok(values)
    }
}

#[test]
fn test_setdiagonal_id_formula() {
    // pins id = len (lower) and id = 2m - len (upper)
    let m = 6;
    for len in 1..=m {
        let mut L = DiagonalMatrix::<f64>::new(m, m);
        L.setdiagonal(&vec![1.0; len], true).unwrap();
        assert_eq!(L.diagonal_ids(), &[len]);

        let mut U = DiagonalMatrix::<f64>::new(m, m);
        U.setdiagonal(&vec![1.0; len], false).unwrap();
        assert_eq!(U.diagonal_ids(), &[2 * m - len]);
    }
}

#[test]
fn test_setdiagonal_readback() {
    let m = 5;
    let vs = [1.0, 2.0, 3.0];
    let mut A = DiagonalMatrix::<f64>::new(m, m);

    // lower: entry k sits at row m - len + k, column k
    let out = A.setdiagonal(&vs, true).unwrap();
    assert_eq!(out, &vs);
    for (k, &v) in vs.iter().enumerate() {
        assert_eq!(A.get(m - vs.len() + k, k), Ok(v));
    }

    // upper: entry k sits at row k, column m - len + k
    A.setdiagonal(&vs, false).unwrap();
    for (k, &v) in vs.iter().enumerate() {
        assert_eq!(A.get(k, m - vs.len() + k), Ok(v));
    }

    // full length selects the main diagonal either way
    A.setdiagonal(&[9.0; 5], true).unwrap();
    A.setdiagonal(&[8.0; 5], false).unwrap();
    assert_eq!(A.diagonal(m), Some(&[8.0; 5][..]));
    assert_eq!(A.diagonal_ids(), &[3, 5, 7]);
}

#[test]
fn test_setdiagonal_overwrites_in_place() {
    let mut A = DiagonalMatrix::<f64>::new(4, 4);
    A.set(3, 1, -1.0).unwrap();
    A.set(2, 0, -2.0).unwrap();
    assert_eq!(A.diagonal(2), Some(&[-2.0, -1.0][..]));

    A.setdiagonal(&[5i64, 6], true).unwrap();
    assert_eq!(A.diagonal(2), Some(&[5.0, 6.0][..]));
    assert_eq!(A.ndiagonals(), 1);
}

#[test]
fn test_setdiagonal_errors() {
    let mut A = DiagonalMatrix::<f32>::new(3, 3);
    assert_eq!(
        A.setdiagonal(&[1.0f64; 4], true),
        Err(DiagonalMatrixError::DiagonalTooLong { len: 4, nrows: 3 })
    );
    assert_eq!(
        A.setdiagonal(&[1.0f64, 1e100], true),
        Err(DiagonalMatrixError::Conversion)
    );
    let empty: [f64; 0] = [];
    assert_eq!(
        A.setdiagonal(&empty, true),
        Err(DiagonalMatrixError::InvalidDiagonal { id: 0, max: 5 })
    );
    assert_eq!(A.ndiagonals(), 0);

    // 4 x 2: the formula can land outside the matrix or on a
    // diagonal shorter than the supplied values
    let mut B = DiagonalMatrix::<f64>::new(4, 2);
    assert_eq!(
        B.setdiagonal(&[1.0], false),
        Err(DiagonalMatrixError::InvalidDiagonal { id: 7, max: 5 })
    );
    assert_eq!(
        B.setdiagonal(&[1.0, 2.0, 3.0], true),
        Err(DiagonalMatrixError::InvalidDiagonal { id: 3, max: 5 })
    );

    // 2 x 4: id 3 has length 2, only the leading entry is written
    let mut C = DiagonalMatrix::<f64>::new(2, 4);
    C.setdiagonal(&[7.0], false).unwrap();
    assert_eq!(C.diagonal(3), Some(&[7.0, 0.0][..]));
}
