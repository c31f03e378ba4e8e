// C = β*C + α*A*B for products with at least one diagonal operand.
//
// Every kernel walks the stored diagonals of its sparse operand in order,
// one at a time, and spreads the entries of the current diagonal over the
// rayon pool.  Entries of one diagonal lie in distinct rows and distinct
// columns, so the destination elements written for different entries never
// coincide.  That is the only property the `DisjointSlice` writes rely on.

use super::core::{diagonal_coords, diagonal_len, diagonal_offset};
use crate::algebra::parallel::{for_each_entry, DisjointSlice};
use crate::algebra::*;
use itertools::Itertools;
use std::iter::zip;

// ---------------------------------------------------------
// Matrix <- DiagonalMatrix * Matrix
// ---------------------------------------------------------

impl<T, S, SB> MultiplyAccumulate<DiagonalMatrix<T>, DenseStorageMatrix<SB, T>>
    for DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsRef<[T]> + AsMut<[T]>,
    SB: AsRef<[T]>,
{
    type T = T;

    fn mul_accumulate_with(
        &mut self,
        A: &DiagonalMatrix<T>,
        B: &DenseStorageMatrix<SB, T>,
        α: T,
        β: T,
        settings: &MultiplySettings,
    ) -> Result<&mut Self, MultiplyError> {
        check_dimensions(A, B, self)?;
        log_kernel("diag * dense -> dense", A, B, A.ndiagonals());

        let (m, n) = self.size();
        let k = B.nrows();
        let am = A.m;
        let bdata = B.data();

        self.data_mut().scale(β);
        let cdata = DisjointSlice::new(self.data_mut());

        for (id, vals) in A.iter() {
            for_each_entry(vals.len(), settings, |p| {
                let (ia, ja) = diagonal_coords(am, id, p);
                let a = α * vals[p];
                for j in 0..n {
                    // SAFETY: row `ia` belongs to entry `p` alone
                    let c = unsafe { cdata.get_mut(ia + m * j) };
                    *c = a.mul_add(bdata[ja + k * j], *c);
                }
            });
        }
        Ok(self)
    }
}

// ---------------------------------------------------------
// Matrix <- Matrix * DiagonalMatrix
// ---------------------------------------------------------

impl<T, S, SA> MultiplyAccumulate<DenseStorageMatrix<SA, T>, DiagonalMatrix<T>>
    for DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsRef<[T]> + AsMut<[T]>,
    SA: AsRef<[T]>,
{
    type T = T;

    fn mul_accumulate_with(
        &mut self,
        A: &DenseStorageMatrix<SA, T>,
        B: &DiagonalMatrix<T>,
        α: T,
        β: T,
        settings: &MultiplySettings,
    ) -> Result<&mut Self, MultiplyError> {
        check_dimensions(A, B, self)?;
        log_kernel("dense * diag -> dense", A, B, B.ndiagonals());

        let m = self.nrows();
        let bm = B.m;
        let adata = A.data();

        self.data_mut().scale(β);
        let cdata = DisjointSlice::new(self.data_mut());

        for (id, vals) in B.iter() {
            for_each_entry(vals.len(), settings, |p| {
                let (ib, jb) = diagonal_coords(bm, id, p);
                let b = α * vals[p];
                let acol = &adata[(ib * m)..(ib + 1) * m];
                for (r, &a) in acol.iter().enumerate() {
                    // SAFETY: column `jb` belongs to entry `p` alone
                    let c = unsafe { cdata.get_mut(r + m * jb) };
                    *c = b.mul_add(a, *c);
                }
            });
        }
        Ok(self)
    }
}

// ---------------------------------------------------------
// DiagonalMatrix <- DiagonalMatrix * DiagonalMatrix
// ---------------------------------------------------------

impl<T> MultiplyAccumulate<DiagonalMatrix<T>, DiagonalMatrix<T>> for DiagonalMatrix<T>
where
    T: FloatT,
{
    type T = T;

    fn mul_accumulate_with(
        &mut self,
        A: &DiagonalMatrix<T>,
        B: &DiagonalMatrix<T>,
        α: T,
        β: T,
        settings: &MultiplySettings,
    ) -> Result<&mut Self, MultiplyError> {
        check_dimensions(A, B, self)?;
        log_kernel("diag * diag -> diag", A, B, A.ndiagonals());

        for vals in self.diagvals.iter_mut() {
            vals.scale(β);
        }

        // symbolic pass: create every destination diagonal that will
        // receive a contribution, so the numeric pass never inserts
        for id in product_diagonals(A, B) {
            self.find_or_insert(id);
        }

        let (am, bm) = (A.m, B.m);
        let cids = &self.diagids;
        let cvals: Vec<DisjointSlice<'_, T>> = self
            .diagvals
            .iter_mut()
            .map(|v| DisjointSlice::new(v.as_mut_slice()))
            .collect();

        for (ida, avals) in A.iter() {
            for_each_entry(avals.len(), settings, |p| {
                let (ia, ja) = diagonal_coords(am, ida, p);
                let a = α * avals[p];
                for (idb, bvals) in diagonals_through_row(B, ja) {
                    let (q, jb) = row_entry(bm, idb, ja);
                    let Some(&b) = bvals.get(q) else { continue };
                    // inserted by the symbolic pass
                    if let Ok(pos) = cids.binary_search(&(ida + idb - bm)) {
                        // SAFETY: row `ia` belongs to entry `p` alone
                        let c = unsafe { cvals[pos].get_mut(diagonal_offset(ia, jb)) };
                        *c = a.mul_add(b, *c);
                    }
                }
            });
        }
        Ok(self)
    }
}

// ---------------------------------------------------------
// Matrix <- DiagonalMatrix * DiagonalMatrix
// ---------------------------------------------------------

impl<T, S> MultiplyAccumulate<DiagonalMatrix<T>, DiagonalMatrix<T>> for DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsRef<[T]> + AsMut<[T]>,
{
    type T = T;

    fn mul_accumulate_with(
        &mut self,
        A: &DiagonalMatrix<T>,
        B: &DiagonalMatrix<T>,
        α: T,
        β: T,
        settings: &MultiplySettings,
    ) -> Result<&mut Self, MultiplyError> {
        check_dimensions(A, B, self)?;
        log_kernel("diag * diag -> dense", A, B, A.ndiagonals());

        let m = self.nrows();
        let (am, bm) = (A.m, B.m);

        self.data_mut().scale(β);
        let cdata = DisjointSlice::new(self.data_mut());

        for (ida, avals) in A.iter() {
            for_each_entry(avals.len(), settings, |p| {
                let (ia, ja) = diagonal_coords(am, ida, p);
                let a = α * avals[p];
                for (idb, bvals) in diagonals_through_row(B, ja) {
                    let (q, jb) = row_entry(bm, idb, ja);
                    let Some(&b) = bvals.get(q) else { continue };
                    // SAFETY: row `ia` belongs to entry `p` alone
                    let c = unsafe { cdata.get_mut(ia + m * jb) };
                    *c = a.mul_add(b, *c);
                }
            });
        }
        Ok(self)
    }
}

// ---------------------------------------------------------
// shared index arithmetic
// ---------------------------------------------------------

fn check_dimensions<MA, MB, MC>(A: &MA, B: &MB, C: &MC) -> Result<(), MultiplyError>
where
    MA: ShapedMatrix,
    MB: ShapedMatrix,
    MC: ShapedMatrix,
{
    let ((arows, acols), (brows, bcols), (crows, ccols)) = (A.size(), B.size(), C.size());
    if acols != brows || crows != arows || ccols != bcols {
        return Err(MultiplyError::IncompatibleDimension {
            arows,
            acols,
            brows,
            bcols,
            crows,
            ccols,
        });
    }
    Ok(())
}

fn log_kernel<MA, MB>(kernel: &'static str, A: &MA, B: &MB, ndiagonals: usize)
where
    MA: ShapedMatrix,
    MB: ShapedMatrix,
{
    tracing::debug!(
        kernel,
        a = ?A.size(),
        b = ?B.size(),
        ndiagonals,
        "multiply"
    );
}

// Stored diagonals of `B` that have an entry in row `row`.  These are the
// ids `m - row ..= m - row + n - 1`, a contiguous run of `B.diagids`.
fn diagonals_through_row<T>(
    B: &DiagonalMatrix<T>,
    row: usize,
) -> impl Iterator<Item = (usize, &[T])> + '_ {
    let lo = B.m - row;
    let hi = lo + B.n - 1;
    let start = B.diagids.partition_point(|&id| id < lo);
    zip(&B.diagids[start..], &B.diagvals[start..])
        .take_while(move |(&id, _)| id <= hi)
        .map(|(&id, v)| (id, v.as_slice()))
}

// Offset along diagonal `id` of an `m` row matrix of its entry in row
// `row`, and the column of that entry.
#[inline]
fn row_entry(m: usize, id: usize, row: usize) -> (usize, usize) {
    if id < m {
        let q = row - (m - id);
        (q, q)
    } else {
        (row, id - m + row)
    }
}

// Inclusive range of rows (`rows == true`) or columns covered by
// diagonal `id` of an `m x n` matrix.
fn span(m: usize, n: usize, id: usize, rows: bool) -> Option<(usize, usize)> {
    let len = diagonal_len(m, n, id);
    if len == 0 {
        return None;
    }
    let (r0, c0) = diagonal_coords(m, id, 0);
    let first = if rows { r0 } else { c0 };
    Some((first, first + len - 1))
}

// Ids of the diagonals of A*B that receive at least one contribution,
// sorted and unique.  Diagonals `ka` of A and `kb` of B meet in the
// diagonal `ka + kb - B.m` of the product whenever the columns of `ka`
// overlap the rows of `kb`.
fn product_diagonals<T>(A: &DiagonalMatrix<T>, B: &DiagonalMatrix<T>) -> Vec<usize> {
    let (k, bn) = (B.m, B.n);
    A.diagids
        .iter()
        .filter_map(|&ka| span(A.m, A.n, ka, false).map(|cols| (ka, cols)))
        .cartesian_product(B.diagids.iter().filter_map(|&kb| {
            span(k, bn, kb, true).map(|rows| (kb, rows))
        }))
        .filter(|((_, (c0, c1)), (_, (r0, r1)))| usize::max(*c0, *r0) <= usize::min(*c1, *r1))
        .map(|((ka, _), (kb, _))| ka + kb - k)
        .sorted_unstable()
        .dedup()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forced_parallel() -> MultiplySettings {
        MultiplySettingsBuilder::default()
            .min_parallel_len(1)
            .min_task_len(1)
            .build()
            .unwrap()
    }

    // A =
    //[ 1.0   ⋅    ⋅   7.0]
    //[  ⋅   2.0   ⋅    ⋅ ]
    //[ 5.0   ⋅   3.0   ⋅ ]
    //[  ⋅   6.0   ⋅   4.0]
    fn test_matrix_4x4() -> DiagonalMatrix<f64> {
        DiagonalMatrix::from_diagonals(
            vec![7, 4, 2],
            vec![vec![7.], vec![1., 2., 3., 4.], vec![5., 6.]],
            4,
            4,
        )
        .unwrap()
    }

    // B =
    //[ 1.0  -1.0   ⋅ ]
    //[  ⋅    2.0  3.0]
    //[ 4.0    ⋅   5.0]
    //[  ⋅   -2.0   ⋅ ]
    fn test_matrix_4x3() -> DiagonalMatrix<f64> {
        DiagonalMatrix::from_diagonals(
            vec![2, 3, 4, 5],
            vec![vec![4., -2.], vec![0., 0., 0.], vec![1., 2., 5.], vec![-1., 3.]],
            4,
            3,
        )
        .unwrap()
    }

    fn reference(A: &Matrix<f64>, B: &Matrix<f64>, C: &Matrix<f64>, α: f64, β: f64) -> Matrix<f64> {
        let mut R = C.clone();
        R.mul(A, B, α, β);
        R
    }

    #[test]
    fn test_row_entry() {
        // B is 4 x 3, diagonal 2 holds (2,0), (3,1)
        assert_eq!(row_entry(4, 2, 2), (0, 0));
        assert_eq!(row_entry(4, 2, 3), (1, 1));
        // diagonal 5 holds (0,1), (1,2)
        assert_eq!(row_entry(4, 5, 0), (0, 1));
        assert_eq!(row_entry(4, 5, 1), (1, 2));

        let B = test_matrix_4x3();
        let ids: Vec<_> = diagonals_through_row(&B, 0).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![4, 5]);
        let ids: Vec<_> = diagonals_through_row(&B, 3).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_product_diagonals() {
        let A = test_matrix_4x4();
        let B = test_matrix_4x3();
        let ids = product_diagonals(&A, &B);

        // every id produced is a valid diagonal of the 4 x 3 product
        assert!(ids.iter().all(|&id| (1..=6).contains(&id)));

        // and every nonzero of the dense product lies on one of them
        let mut P = Matrix::zeros((4, 3));
        P.mul(&A.to_dense(), &B.to_dense(), 1.0, 0.0);
        for i in 0..4 {
            for j in 0..3 {
                if P[(i, j)] != 0.0 {
                    assert!(ids.contains(&(4 - i + j)));
                }
            }
        }
    }

    #[test]
    fn test_diag_dense() {
        let A = test_matrix_4x4();
        let B = Matrix::from(&[[1., 2.], [3., 4.], [5., 6.], [7., 8.]]);
        let C0 = Matrix::from(&[[1., 1.], [1., 1.], [1., 1.], [1., 1.]]);

        for settings in [MultiplySettings::default(), forced_parallel()] {
            let mut C = C0.clone();
            C.mul_accumulate_with(&A, &B, 2.0, -1.0, &settings).unwrap();
            assert_eq!(C, reference(&A.to_dense(), &B, &C0, 2.0, -1.0));
        }
    }

    #[test]
    fn test_dense_diag() {
        let A = Matrix::from(&[[1., 2., 3., 4.], [5., 6., 7., 8.]]);
        let B = test_matrix_4x3();
        let C0 = Matrix::from(&[[1., 2., 3.], [4., 5., 6.]]);

        for settings in [MultiplySettings::default(), forced_parallel()] {
            let mut C = C0.clone();
            C.mul_accumulate_with(&A, &B, 0.5, 2.0, &settings).unwrap();
            assert_eq!(C, reference(&A, &B.to_dense(), &C0, 0.5, 2.0));
        }
    }

    #[test]
    fn test_diag_diag_dense() {
        let A = test_matrix_4x4();
        let B = test_matrix_4x3();
        let C0 = Matrix::from(&[[1., 0., 0.], [0., 1., 0.], [0., 0., 1.], [1., 1., 1.]]);

        for settings in [MultiplySettings::default(), forced_parallel()] {
            let mut C = C0.clone();
            C.mul_accumulate_with(&A, &B, 1.0, 3.0, &settings).unwrap();
            assert_eq!(C, reference(&A.to_dense(), &B.to_dense(), &C0, 1.0, 3.0));
        }
    }

    #[test]
    fn test_diag_diag_diag() {
        let A = test_matrix_4x4();
        let B = test_matrix_4x3();

        for settings in [MultiplySettings::default(), forced_parallel()] {
            let mut C = DiagonalMatrix::<f64>::new(4, 3);
            C.set(3, 2, 1.0).unwrap();
            let C0 = C.to_dense();

            C.mul_accumulate_with(&A, &B, -1.0, 2.0, &settings).unwrap();
            assert!(C.check_format().is_ok());
            assert_eq!(
                C.to_dense(),
                reference(&A.to_dense(), &B.to_dense(), &C0, -1.0, 2.0)
            );

            // the stored pattern is the existing diagonal plus the product's
            let mut expected = product_diagonals(&A, &B);
            expected.push(4 - 3 + 2);
            expected.sort_unstable();
            expected.dedup();
            assert_eq!(C.diagonal_ids(), &expected[..]);
        }
    }

    #[test]
    fn test_diag_diag_disjoint_patterns() {
        // A only has column 0 populated and the one diagonal of B misses
        // row 0, so the product is empty and no diagonals are created
        let mut A = DiagonalMatrix::<f64>::new(3, 3);
        A.set(2, 0, 1.0).unwrap();
        let mut B = DiagonalMatrix::<f64>::new(3, 3);
        B.set(2, 0, 1.0).unwrap();

        let mut C = DiagonalMatrix::<f64>::new(3, 3);
        C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
        assert_eq!(C.ndiagonals(), 0);
    }

    #[test]
    fn test_diag_diag_stored_zeros_create_diagonals() {
        // setting (1, 2) stores diagonal 4 over (0, 1) and (1, 2), so B
        // has a stored zero in row 0 and diagonal 1 + 4 - 3 is created
        let mut A = DiagonalMatrix::<f64>::new(3, 3);
        A.set(2, 0, 1.0).unwrap();
        let mut B = DiagonalMatrix::<f64>::new(3, 3);
        B.set(1, 2, 1.0).unwrap();
        assert_eq!(B.diagonal(4), Some(&[0.0, 1.0][..]));

        let mut C = DiagonalMatrix::<f64>::new(3, 3);
        C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
        assert_eq!(C.diagonal_ids(), &[2]);
        assert_eq!(C.diagonal(2), Some(&[0.0, 0.0][..]));
        assert!(C.check_format().is_ok());
    }

    #[test]
    fn test_dimension_mismatch_leaves_destination() {
        let A = test_matrix_4x4();
        let B = Matrix::from(&[[1., 2.], [3., 4.], [5., 6.]]);
        let mut C = Matrix::from(&[[9., 9.], [9., 9.], [9., 9.], [9., 9.]]);
        let C0 = C.clone();

        let err = C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            MultiplyError::IncompatibleDimension {
                acols: 4,
                brows: 3,
                ..
            }
        ));
        assert_eq!(C, C0);

        let mut D = DiagonalMatrix::<f64>::identity(3);
        let D0 = D.clone();
        assert!(D.mul_accumulate(&A, &A, 1.0, 0.0).is_err());
        assert_eq!(D, D0);
    }

    #[test]
    fn test_beta_scaling_propagates_nan() {
        let A = DiagonalMatrix::<f64>::new(2, 2);
        let B = Matrix::from(&[[1., 0.], [0., 1.]]);
        let mut C = Matrix::from(&[[f64::NAN, 1.], [f64::INFINITY, 2.]]);

        C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
        assert!(C[(0, 0)].is_nan());
        assert!(C[(1, 0)].is_nan());
        assert_eq!(C[(0, 1)], 0.0);
        assert_eq!(C[(1, 1)], 0.0);
    }

    #[test]
    fn test_beta_scaling_propagates_nan_dense_diag() {
        let A = Matrix::from(&[[1., 0.], [0., 1.]]);
        let B = DiagonalMatrix::<f64>::new(2, 2);
        let mut C = Matrix::from(&[[1., f64::NAN], [2., f64::NEG_INFINITY]]);

        C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
        assert_eq!(C[(0, 0)], 0.0);
        assert_eq!(C[(1, 0)], 0.0);
        assert!(C[(0, 1)].is_nan());
        assert!(C[(1, 1)].is_nan());
    }

    #[test]
    fn test_beta_scaling_propagates_nan_diag_diag_dense() {
        let A = DiagonalMatrix::<f64>::identity(2);
        let B = DiagonalMatrix::<f64>::new(2, 2);
        let mut C = Matrix::from(&[[f64::INFINITY, 1.], [2., f64::NAN]]);

        C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
        assert!(C[(0, 0)].is_nan());
        assert!(C[(1, 1)].is_nan());
        assert_eq!(C[(0, 1)], 0.0);
        assert_eq!(C[(1, 0)], 0.0);
    }

    #[test]
    fn test_beta_scaling_propagates_nan_diag_diag_diag() {
        let A = DiagonalMatrix::<f64>::identity(3);
        let B = DiagonalMatrix::<f64>::new(3, 3);
        let mut C = DiagonalMatrix::<f64>::new(3, 3);
        C.set(0, 0, f64::NAN).unwrap();
        C.set(2, 2, f64::INFINITY).unwrap();
        C.set(1, 0, 5.0).unwrap();

        C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
        assert_eq!(C.diagonal_ids(), &[2, 3]);
        assert!(C.get(0, 0).unwrap().is_nan());
        assert_eq!(C.get(1, 1), Ok(0.0));
        assert!(C.get(2, 2).unwrap().is_nan());
        assert_eq!(C.diagonal(2), Some(&[0.0, 0.0][..]));
    }
}

#[cfg(all(test, feature = "bench"))]
mod bench {

    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn banded_random(rng: &mut StdRng, n: usize, ids: &[usize]) -> DiagonalMatrix<f64> {
        let mut A = DiagonalMatrix::new(n, n);
        for &id in ids {
            for p in 0..A.diagonal_len(id) {
                let (i, j) = A.diagonal_coords(id, p);
                A.set(i, j, rng.gen_range(-1.0..1.0)).unwrap();
            }
        }
        A
    }

    #[test]
    fn bench_serial_vs_parallel() {
        let n = 5000;
        let mut rng = StdRng::seed_from_u64(1);
        let A = banded_random(&mut rng, n, &[1, 700, 4960, 5000, 5040, 5999, 9999]);
        let B = banded_random(&mut rng, n, &[3, 4999, 5000, 5001, 6000]);

        let serial = MultiplySettingsBuilder::default()
            .min_parallel_len(usize::MAX)
            .build()
            .unwrap();
        let parallel = MultiplySettingsBuilder::default()
            .min_parallel_len(1)
            .build()
            .unwrap();

        let mut C1 = DiagonalMatrix::new(n, n);
        let mut C2 = DiagonalMatrix::new(n, n);
        C1.mul_accumulate_with(&A, &B, 1.0, 0.0, &serial).unwrap();
        C2.mul_accumulate_with(&A, &B, 1.0, 0.0, &parallel).unwrap();

        // each entry is accumulated in the same order either way
        assert_eq!(C1, C2);
    }
}
