// Sparse matrices in this crate are stored by diagonal.  Dense
// operands and results use the column major `Matrix` type.

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix stored as a sorted collection of (possibly widely spaced) diagonals.
///
/// A diagonal is identified by its id `k = m - i + j`, taking values in
/// `1..=m+n-1`.  The main diagonal has id `m`, sub-diagonals have ids
/// below `m` and super-diagonals ids above `m`.   Values along each diagonal
/// are stored in order of increasing row index.
///
/// __Example usage__ : To construct the 4 x 4 matrix
/// ```text
/// A = [1.  0.  0.  7.]
///     [0.  2.  0.  0.]
///     [5.  0.  3.  0.]
///     [0.  6.  0.  4.]
/// ```
///
/// ```no_run
/// use diagmat::algebra::DiagonalMatrix;
///
/// let A : DiagonalMatrix<f64> = DiagonalMatrix::from_diagonals(
///    vec![7, 4, 2],                                      // diagonal ids
///    vec![vec![7.], vec![1., 2., 3., 4.], vec![5., 6.]], // values
///    4,                                                  // m
///    4,                                                  // n
///  ).unwrap();
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
/// ```
///
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct DiagonalMatrix<T = f64> {
    /// number of rows
    pub(crate) m: usize,
    /// number of columns
    pub(crate) n: usize,
    /// stored diagonal ids, strictly increasing
    pub(crate) diagids: Vec<usize>,
    /// stored values, one vector per entry of `diagids`
    pub(crate) diagvals: Vec<Vec<T>>,
}
