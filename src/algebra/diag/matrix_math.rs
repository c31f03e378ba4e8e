use super::core::diagonal_coords;
use crate::algebra::*;

impl<T> MatrixMath for DiagonalMatrix<T>
where
    T: FloatT,
{
    type T = T;

    //scalar mut operations
    fn scale(&mut self, c: T) {
        for vals in self.diagvals.iter_mut() {
            vals.scale(c);
        }
    }

    fn negate(&mut self) {
        for vals in self.diagvals.iter_mut() {
            vals.negate();
        }
    }

    fn norm_inf(&self) -> T {
        self.diagvals
            .iter()
            .fold(T::zero(), |acc, v| T::max(acc, v.norm_inf()))
    }
}

impl<T> MatrixVectorMultiply for DiagonalMatrix<T>
where
    T: FloatT,
{
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);

        y.scale(b);
        for (id, vals) in self.iter() {
            for (p, &v) in vals.iter().enumerate() {
                let (i, j) = diagonal_coords(self.m, id, p);
                y[i] = (a * v).mul_add(x[j], y[i]);
            }
        }
    }
}

#[test]
fn test_diag_scale_and_gemv() {
    // A =
    //[ 1.0  -2.0   ⋅ ]
    //[ 3.0    ⋅   4.0]
    let mut A = DiagonalMatrix::<f64>::new(2, 3);
    A.set(0, 0, 1.0).unwrap();
    A.set(0, 1, -2.0).unwrap();
    A.set(1, 0, 3.0).unwrap();
    A.set(1, 2, 4.0).unwrap();
    assert_eq!(A.norm_inf(), 4.0);

    let x = [1.0, 2.0, -1.0];
    let mut y = vec![1.0, 1.0];
    A.gemv(&mut y, &x, 2.0, -1.0);
    assert_eq!(y, vec![-7.0, -3.0]);

    // agrees with the dense product
    let mut z = vec![1.0, 1.0];
    A.to_dense().gemv(&mut z, &x, 2.0, -1.0);
    assert_eq!(y, z);

    A.scale(-0.5);
    A.negate();
    assert_eq!(A.get(1, 2), Ok(2.0));
    assert_eq!(A.norm_inf(), 2.0);
}
