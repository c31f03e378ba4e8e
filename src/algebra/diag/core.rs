use crate::algebra::*;
use itertools::Itertools;
use num_traits::{NumCast, ToPrimitive};
use std::iter::zip;

impl<T> DiagonalMatrix<T>
where
    T: FloatT,
{
    /// Empty `m x n` matrix with no stored diagonals.
    ///
    /// Diagonals are created on demand by [`set`](DiagonalMatrix::set),
    /// [`add_to`](DiagonalMatrix::add_to) and
    /// [`setdiagonal`](DiagonalMatrix::setdiagonal).
    pub fn new(m: usize, n: usize) -> Self {
        Self {
            m,
            n,
            diagids: Vec::new(),
            diagvals: Vec::new(),
        }
    }

    /// `DiagonalMatrix` constructor from diagonal ids and values.
    ///
    /// The ids may be supplied in any order and are sorted once here.
    ///
    /// # Errors
    /// Fails if `ids` and `values` have different lengths, if any id is
    /// outside `1..=m+n-1`, or if an id appears more than once.
    ///
    /// This constructor does __not__ check that each value vector has the
    /// length of its diagonal (see [`diagonal_len`](DiagonalMatrix::diagonal_len)).
    /// Responsibility for this is left to the caller; element access on a
    /// matrix with mis-sized diagonals silently reads and writes the wrong
    /// entries.  Use [`check_format`](DiagonalMatrix::check_format) to
    /// verify a matrix from an untrusted source.
    pub fn from_diagonals(
        ids: Vec<usize>,
        values: Vec<Vec<T>>,
        m: usize,
        n: usize,
    ) -> Result<Self, DiagonalMatrixError> {
        if ids.len() != values.len() {
            return Err(DiagonalMatrixError::IncompatibleDimension);
        }
        let max = max_diagonal_id(m, n);
        if let Some(&id) = ids.iter().find(|&&id| id == 0 || id > max) {
            return Err(DiagonalMatrixError::InvalidDiagonal { id, max });
        }

        let (diagids, diagvals): (Vec<_>, Vec<_>) =
            zip(ids, values).sorted_by_key(|(id, _)| *id).unzip();

        if let Some((&id, _)) = diagids.iter().tuple_windows().find(|(a, b)| a == b) {
            return Err(DiagonalMatrixError::DuplicateDiagonal(id));
        }

        Ok(Self {
            m,
            n,
            diagids,
            diagvals,
        })
    }

    /// As [`from_diagonals`](DiagonalMatrix::from_diagonals), converting values
    /// of any primitive numeric type to `T`.
    ///
    /// # Errors
    /// Additionally fails with [`DiagonalMatrixError::Conversion`] if any value
    /// can not be represented as `T`.
    pub fn from_diagonals_as<V>(
        ids: Vec<usize>,
        values: Vec<Vec<V>>,
        m: usize,
        n: usize,
    ) -> Result<Self, DiagonalMatrixError>
    where
        V: ToPrimitive,
    {
        let values = values
            .iter()
            .map(|v| convert_values(v))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_diagonals(ids, values, m, n)
    }

    /// Square `n x n` identity matrix, stored as a single diagonal.
    pub fn identity(n: usize) -> Self {
        Self {
            m: n,
            n,
            diagids: vec![n],
            diagvals: vec![vec![T::one(); n]],
        }
    }

    /// Position of diagonal `id` in the stored collection.
    ///
    /// Returns `Ok(position)` if the diagonal is stored and otherwise
    /// `Err(position)`, the position at which it would be inserted to
    /// keep the collection sorted.
    #[inline]
    pub fn find(&self, id: usize) -> Result<usize, usize> {
        self.diagids.binary_search(&id)
    }

    /// Id of the diagonal passing through element `(i, j)`.
    ///
    /// Returns `None` if `(i, j)` lies outside the matrix.
    #[inline]
    pub fn diagonal_id(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.m && j < self.n).then(|| diagonal_id(self.m, i, j))
    }

    /// Coordinates of the entry at offset `p` along diagonal `id`.
    ///
    /// Sub-diagonals (`id < m`) start in the first column and `p` walks
    /// down the rows below the main diagonal.  The main and super-diagonals
    /// (`id >= m`) start in the first row.
    #[inline]
    pub fn diagonal_coords(&self, id: usize, p: usize) -> (usize, usize) {
        diagonal_coords(self.m, id, p)
    }

    /// Number of entries on diagonal `id`.
    #[inline]
    pub fn diagonal_len(&self, id: usize) -> usize {
        diagonal_len(self.m, self.n, id)
    }

    /// Largest valid diagonal id, `m + n - 1`
    pub fn max_diagonal_id(&self) -> usize {
        max_diagonal_id(self.m, self.n)
    }

    /// Number of stored diagonals
    pub fn ndiagonals(&self) -> usize {
        self.diagids.len()
    }

    /// Number of stored entries, including explicitly stored zeros
    pub fn nnz(&self) -> usize {
        self.diagvals.iter().map(Vec::len).sum()
    }

    /// Stored diagonal ids, in increasing order
    pub fn diagonal_ids(&self) -> &[usize] {
        &self.diagids
    }

    /// Stored values of diagonal `id`, or `None` if it is not stored
    pub fn diagonal(&self, id: usize) -> Option<&[T]> {
        self.find(id).ok().map(|pos| self.diagvals[pos].as_slice())
    }

    /// Iterator over `(id, values)` of all stored diagonals, in order of
    /// increasing id.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, &[T])> + '_ {
        zip(&self.diagids, &self.diagvals).map(|(&id, v)| (id, v.as_slice()))
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), DiagonalMatrixError> {
        if self.diagids.len() != self.diagvals.len() {
            return Err(DiagonalMatrixError::IncompatibleDimension);
        }

        //check for id monotonicity
        if self.diagids.windows(2).any(|c| c[0] >= c[1]) {
            return Err(DiagonalMatrixError::BadDiagonalOrdering);
        }

        let max = self.max_diagonal_id();
        for (&id, vals) in zip(&self.diagids, &self.diagvals) {
            if id == 0 || id > max {
                return Err(DiagonalMatrixError::InvalidDiagonal { id, max });
            }
            let expected = self.diagonal_len(id);
            if vals.len() != expected {
                return Err(DiagonalMatrixError::BadValueLength {
                    id,
                    expected,
                    found: vals.len(),
                });
            }
        }
        Ok(())
    }

    // Inserts diagonal `id` with values `vals` at position `pos`,
    // as returned by a failed `find`.  Returns `pos`
    pub(crate) fn insert_diagonal(&mut self, pos: usize, id: usize, vals: Vec<T>) -> usize {
        debug_assert_eq!(self.find(id), Err(pos));
        tracing::trace!(id, len = vals.len(), "inserting diagonal");
        self.diagids.insert(pos, id);
        self.diagvals.insert(pos, vals);
        pos
    }

    // Position of diagonal `id`, creating it zero filled if absent
    pub(crate) fn find_or_insert(&mut self, id: usize) -> usize {
        match self.find(id) {
            Ok(pos) => pos,
            Err(pos) => {
                let len = self.diagonal_len(id);
                self.insert_diagonal(pos, id, vec![T::zero(); len])
            }
        }
    }
}

impl<T> ShapedMatrix for DiagonalMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T> std::fmt::Display for DiagonalMatrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        display_matrix(f, self.size(), |i, j| self.value(i, j))
    }
}

// ---------------------------------------------------------
// index algebra shared by element access and the kernels
// ---------------------------------------------------------

#[inline]
pub(crate) fn max_diagonal_id(m: usize, n: usize) -> usize {
    (m + n).saturating_sub(1)
}

#[inline]
pub(crate) fn diagonal_coords(m: usize, id: usize, p: usize) -> (usize, usize) {
    if id < m {
        (m - id + p, p)
    } else {
        (p, id - m + p)
    }
}

// id of the diagonal through the in-bounds element (i, j)
#[inline]
pub(crate) fn diagonal_id(m: usize, i: usize, j: usize) -> usize {
    m - i + j
}

// offset along its diagonal of the in-bounds element (i, j)
#[inline]
pub(crate) fn diagonal_offset(i: usize, j: usize) -> usize {
    if i > j {
        j
    } else {
        i
    }
}

#[inline]
pub(crate) fn diagonal_len(m: usize, n: usize, id: usize) -> usize {
    if id == 0 || id > max_diagonal_id(m, n) {
        0
    } else if id < m {
        usize::min(id, n)
    } else {
        usize::min(m, m + n - id)
    }
}

pub(crate) fn convert_values<V, T>(values: &[V]) -> Result<Vec<T>, DiagonalMatrixError>
where
    V: ToPrimitive,
    T: FloatT,
{
    values
        .iter()
        .map(|v| convert_value(v))
        .collect::<Option<Vec<T>>>()
        .ok_or(DiagonalMatrixError::Conversion)
}

// Finite values that overflow the range of T are rejected rather
// than saturated to infinity.  Loss of precision is accepted.
pub(crate) fn convert_value<V, T>(v: &V) -> Option<T>
where
    V: ToPrimitive,
    T: FloatT,
{
    let x = v.to_f64()?;
    let t = <T as NumCast>::from(x)?;
    if x.is_finite() && !t.is_finite() {
        None
    } else {
        Some(t)
    }
}

#[test]
fn test_diagonal_index_algebra() {
    // 3 x 5
    //
    //  id:   3 4 5 6 7
    //        2 3 4 5 6
    //        1 2 3 4 5
    let (m, n) = (3, 5);
    assert_eq!(max_diagonal_id(m, n), 7);
    let lens: Vec<_> = (0..=8).map(|id| diagonal_len(m, n, id)).collect();
    assert_eq!(lens, vec![0, 1, 2, 3, 3, 3, 2, 1, 0]);

    // every element maps to a diagonal and back again
    for i in 0..m {
        for j in 0..n {
            let id = diagonal_id(m, i, j);
            let p = diagonal_offset(i, j);
            assert!(p < diagonal_len(m, n, id));
            assert_eq!(diagonal_coords(m, id, p), (i, j));
        }
    }

    // 5 x 2
    let (m, n) = (5, 2);
    let lens: Vec<_> = (1..=6).map(|id| diagonal_len(m, n, id)).collect();
    assert_eq!(lens, vec![1, 2, 2, 2, 2, 1]);
    assert_eq!(diagonal_coords(m, 1, 0), (4, 0));
    assert_eq!(diagonal_coords(m, 6, 0), (0, 1));
}

#[test]
fn test_diagonal_id_out_of_bounds() {
    let A = DiagonalMatrix::<f64>::new(3, 5);
    assert_eq!(A.diagonal_id(0, 0), Some(3));
    assert_eq!(A.diagonal_id(2, 0), Some(1));
    assert_eq!(A.diagonal_id(0, 4), Some(7));
    assert_eq!(A.diagonal_id(3, 0), None);
    assert_eq!(A.diagonal_id(4, 0), None);
    assert_eq!(A.diagonal_id(0, 5), None);
}

#[test]
fn test_from_diagonals_sorts_and_rejects_duplicates() {
    let sorted = DiagonalMatrix::from_diagonals(
        vec![2, 4, 7],
        vec![vec![5., 6.], vec![1., 2., 3., 4.], vec![7.]],
        4,
        4,
    )
    .unwrap();
    let shuffled = DiagonalMatrix::from_diagonals(
        vec![7, 2, 4],
        vec![vec![7.], vec![5., 6.], vec![1., 2., 3., 4.]],
        4,
        4,
    )
    .unwrap();
    assert_eq!(sorted, shuffled);
    assert_eq!(sorted.diagonal_ids(), &[2, 4, 7]);
    assert!(sorted.check_format().is_ok());

    let dup = DiagonalMatrix::from_diagonals(
        vec![4, 2, 4],
        vec![vec![1., 2., 3., 4.], vec![5., 6.], vec![0., 0., 0., 0.]],
        4,
        4,
    );
    assert_eq!(dup, Err(DiagonalMatrixError::DuplicateDiagonal(4)));

    let bad = DiagonalMatrix::<f64>::from_diagonals(vec![8], vec![vec![1.]], 4, 4);
    assert_eq!(
        bad,
        Err(DiagonalMatrixError::InvalidDiagonal { id: 8, max: 7 })
    );
}

#[test]
fn test_check_format() {
    // mis-sized values are accepted by the constructor
    let A = DiagonalMatrix::from_diagonals(vec![3], vec![vec![1., 2.]], 4, 4).unwrap();
    assert_eq!(
        A.check_format(),
        Err(DiagonalMatrixError::BadValueLength {
            id: 3,
            expected: 3,
            found: 2
        })
    );

    let mut A = DiagonalMatrix::<f64>::identity(3);
    assert!(A.check_format().is_ok());
    A.diagids.push(2);
    A.diagvals.push(vec![0., 0.]);
    assert_eq!(
        A.check_format(),
        Err(DiagonalMatrixError::BadDiagonalOrdering)
    );
}

#[test]
fn test_from_diagonals_as() {
    let A = DiagonalMatrix::<f32>::from_diagonals_as(vec![2], vec![vec![1i32, -4]], 2, 2).unwrap();
    assert_eq!(A.diagonal(2), Some(&[1.0f32, -4.0][..]));

    let B = DiagonalMatrix::<f32>::from_diagonals_as(vec![1], vec![vec![1e300f64]], 2, 2);
    assert_eq!(B, Err(DiagonalMatrixError::Conversion));
}
