use crate::algebra::*;

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self {
            size,
            data,
            phantom: std::marker::PhantomData::<T>,
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        Self {
            size,
            data: src.to_vec(),
            phantom: std::marker::PhantomData::<T>,
        }
    }
}

impl<S, T> DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsMut<[T]> + AsRef<[T]>,
{
    pub fn set_identity(&mut self) {
        assert!(self.is_square());
        self.data_mut().set(T::zero());
        for i in 0..self.ncols() {
            self[(i, i)] = T::one();
        }
    }

    pub fn copy_from_slice(&mut self, src: &[T]) -> &mut Self {
        self.data_mut().copy_from_slice(src);
        self
    }
}

// row-major array initialization, so that the data reads
// in the source the same way as the matrix it produces
impl<T, const R: usize, const C: usize> From<&[[T; C]; R]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; C]; R]) -> Self {
        let mut mat = Matrix::zeros((R, C));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                mat[(i, j)] = v;
            }
        }
        mat
    }
}

impl<S, T> std::fmt::Display for DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsRef<[T]>,
{
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        display_matrix(f, self.size(), |i, j| self[(i, j)])
    }
}

pub(crate) fn display_matrix<T, F>(
    f: &mut std::fmt::Formatter,
    size: (usize, usize),
    value: F,
) -> std::fmt::Result
where
    T: FloatT,
    F: Fn(usize, usize) -> T,
{
    writeln!(f)?;
    for i in 0..size.0 {
        write!(f, "[ ")?;
        for j in 0..size.1 {
            write!(f, " {:?}", value(i, j))?;
        }
        writeln!(f, "]")?;
    }
    writeln!(f)?;
    Ok(())
}

#[test]
fn test_dense_identity_and_display() {
    let I = Matrix::<f64>::identity(3);
    assert_eq!(I.data, vec![1., 0., 0., 0., 1., 0., 0., 0., 1.]);

    let A = Matrix::from(&[[1.0, 2.0], [3.0, 4.0]]);
    assert_eq!(A.data, vec![1., 3., 2., 4.]);
    assert_eq!(format!("{}", A), "\n[  1.0 2.0]\n[  3.0 4.0]\n\n");
}
