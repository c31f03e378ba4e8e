use super::{FloatT, VectorMath};
use std::iter::zip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn scalarop(&mut self, op: impl Fn(T) -> T) -> &mut Self {
        for x in &mut *self {
            *x = op(*x);
        }
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.scalarop(|_x| c)
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.scalarop(|x| x * c)
    }

    fn negate(&mut self) -> &mut Self {
        self.scalarop(|x| -x)
    }

    // Returns infinity norm
    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for v in self.iter().map(|v| v.abs()) {
            if v.is_nan() {
                return T::nan();
            }
            out = if v > out { v } else { out };
        }
        out
    }

    // max absolute difference (used for unit testing)
    fn norm_inf_diff(&self, b: &[T]) -> T {
        assert_eq!(self.len(), b.len());
        zip(self, b).fold(T::zero(), |acc, (x, y)| T::max(acc, T::abs(*x - *y)))
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|&x| T::is_finite(x))
    }

    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        assert_eq!(self.len(), x.len());
        zip(&mut *self, x).for_each(|(y, x)| *y = a * (*x) + b * (*y));
        self
    }
}

#[test]
fn test_vector_scale_propagates_nonfinite() {
    let mut v = vec![1.0, f64::INFINITY, f64::NAN, -2.0];
    v.scale(0.0);
    assert_eq!(v[0], 0.0);
    assert!(v[1].is_nan());
    assert!(v[2].is_nan());
    assert!(!v.is_finite());

    let mut w = vec![1.0, -3.0, 2.0];
    assert_eq!(w.norm_inf(), 3.0);
    assert_eq!(w.norm_inf_diff(&[1.5, -3.0, 0.0]), 2.0);
    w.axpby(2.0, &[1.0, 1.0, 1.0], -1.0);
    assert_eq!(w, vec![1.0, 5.0, 0.0]);
}
