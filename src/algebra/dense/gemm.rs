use crate::algebra::*;

impl<S, T> MultiplyGEMM for DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsMut<[T]> + AsRef<[T]>,
{
    type T = T;
    // implements self = C = αA*B + βC
    //
    // Plain column-oriented triple loop.  This is the dense reference
    // against which the diagonal kernels are checked, and the fallback
    // for dense-only products.
    fn mul<MATA, MATB>(&mut self, A: &MATA, B: &MATB, α: T, β: T) -> &Self
    where
        MATA: DenseMatrix<T>,
        MATB: DenseMatrix<T>,
    {
        assert!(A.ncols() == B.nrows() && self.nrows() == A.nrows() && self.ncols() == B.ncols());

        self.data_mut().scale(β);

        let k = A.ncols();
        for j in 0..self.ncols() {
            let Ccol = self.col_slice_mut(j);
            for l in 0..k {
                let b = α * B[(l, j)];
                for (i, c) in Ccol.iter_mut().enumerate() {
                    *c = b.mul_add(A[(i, l)], *c);
                }
            }
        }
        self
    }
}

#[test]
fn test_gemm() {
    let (m, n, k) = (2, 4, 3);
    let a = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
    let b = vec![
        1.0, 5.0, 9.0, 2.0, 6.0, 10.0, 3.0, 7.0, 11.0, 4.0, 8.0, 12.0,
    ];
    let c = vec![2.0, 7.0, 6.0, 2.0, 0.0, 7.0, 4.0, 2.0];

    let mut A = Matrix::zeros((m, k));
    let mut B = Matrix::zeros((k, n));
    let mut C = Matrix::<f64>::zeros((m, n));
    A.copy_from_slice(&a);
    B.copy_from_slice(&b);
    C.copy_from_slice(&c);
    C.mul(&A, &B, 1.0, 1.0);

    assert!(C.data == vec![40.0, 90.0, 50.0, 100.0, 50.0, 120.0, 60.0, 130.0]);

    // borrowed operands, β = 0 overwrite
    let A = BorrowedMatrix::from_slice(&a, m, k);
    let B = BorrowedMatrix::from_slice(&b, k, n);
    let mut C = Matrix::<f64>::zeros((m, n));
    C.data.fill(100.0);
    C.mul(&A, &B, 2.0, 0.0);

    assert!(C.data == vec![76.0, 166.0, 88.0, 196.0, 100.0, 226.0, 112.0, 256.0]);
}
