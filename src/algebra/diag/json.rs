use crate::algebra::*;

use serde::{de::DeserializeOwned, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

/// JSON file storage for matrices.
///
/// JSON has no representation for non-finite values, so writing a matrix
/// holding a NaN or an infinity fails with [`io::ErrorKind::InvalidInput`].
pub trait MatrixJSONReadWrite: Sized {
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error>;
    fn read_from_file(file: &mut File) -> Result<Self, io::Error>;
}

impl<T> MatrixJSONReadWrite for DiagonalMatrix<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        if !self.diagvals.iter().all(|v| v.is_finite()) {
            return Err(nonfinite_error());
        }
        let json = serde_json::to_string(self)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    // the stored data is not trusted, so the format is checked again
    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let A: Self = serde_json::from_str(&buffer)?;
        A.check_format()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(A)
    }
}

impl<T> MatrixJSONReadWrite for Matrix<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        if !self.data.is_finite() {
            return Err(nonfinite_error());
        }
        let json = serde_json::to_string(self)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let M: Self = serde_json::from_str(&buffer)?;
        let (m, n) = M.size;
        if M.data.len() != m * n {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "dense matrix data does not match its size",
            ));
        }
        Ok(M)
    }
}

fn nonfinite_error() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        "non-finite values can not be written as JSON",
    )
}

#[test]
fn test_json_io() {
    use std::io::{Seek, SeekFrom};

    let mut A = DiagonalMatrix::<f64>::new(3, 5);
    A.setdiagonal(&[1.5, -2.0, 0.1], false).unwrap();
    A.set(2, 0, 1e-300).unwrap();

    let mut file = tempfile::tempfile().unwrap();
    A.write_to_file(&mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let B = DiagonalMatrix::<f64>::read_from_file(&mut file).unwrap();
    assert_eq!(A, B);

    let M = A.to_dense();
    let mut file = tempfile::tempfile().unwrap();
    M.write_to_file(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(Matrix::<f64>::read_from_file(&mut file).unwrap(), M);
}

#[test]
fn test_json_rejects_bad_format() {
    use std::io::{Seek, SeekFrom};

    // diagonal 3 of a 4 x 4 matrix has three entries, not two
    let json = r#"{"m":4,"n":4,"diagids":[3],"diagvals":[[1.0,2.0]]}"#;
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let err = DiagonalMatrix::<f64>::read_from_file(&mut file).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_json_rejects_nonfinite_values() {
    let mut A = DiagonalMatrix::<f64>::identity(3);
    A.set(1, 0, f64::NAN).unwrap();
    let mut file = tempfile::tempfile().unwrap();
    let err = A.write_to_file(&mut file).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert_eq!(file.metadata().unwrap().len(), 0);

    let mut M = Matrix::<f64>::identity(2);
    M[(0, 1)] = f64::INFINITY;
    let err = M.write_to_file(&mut file).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
}
