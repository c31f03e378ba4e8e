use crate::algebra::*;

impl<S, T> MatrixMath for DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsMut<[T]> + AsRef<[T]>,
{
    type T = T;

    //scalar mut operations
    fn scale(&mut self, c: T) {
        self.data_mut().scale(c);
    }

    fn negate(&mut self) {
        self.data_mut().negate();
    }

    fn norm_inf(&self) -> T {
        self.data().norm_inf()
    }
}

impl<S, T> MatrixVectorMultiply for DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsRef<[T]>,
{
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.ncols());
        assert_eq!(y.len(), self.nrows());

        y.scale(b);
        for (col, &xcol) in x.iter().enumerate() {
            y.axpby(a * xcol, self.col_slice(col), T::one());
        }
    }
}

#[test]
fn test_dense_scale_and_gemv() {
    let mut A = Matrix::from(&[[1.0, -2.0], [3.0, 4.0], [0.0, 5.0]]);
    assert_eq!(A.norm_inf(), 5.0);

    let x = [1.0, 2.0];
    let mut y = vec![1.0, 1.0, 1.0];
    A.gemv(&mut y, &x, 2.0, -1.0);
    assert_eq!(y, vec![-7.0, 21.0, 19.0]);

    A.scale(2.0);
    A.negate();
    assert_eq!(A.data, vec![-2.0, -6.0, 0.0, 4.0, -8.0, -10.0]);
}
