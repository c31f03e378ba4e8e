use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by diagonal matrix construction, access and assembly operations.
pub enum DiagonalMatrixError {
    /// Element index lies outside the matrix extent
    #[error("Index ({row}, {col}) is out of bounds for a {nrows} x {ncols} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },
    /// The same diagonal id appears more than once in the constructor input
    #[error("Diagonal {0} is specified more than once")]
    DuplicateDiagonal(usize),
    /// More diagonal values supplied than the matrix has rows
    #[error("Diagonal of length {len} exceeds the row dimension {nrows}")]
    DiagonalTooLong { len: usize, nrows: usize },
    /// Diagonal id outside of `1..=max`
    #[error("Diagonal id {id} is outside the valid range 1..={max}")]
    InvalidDiagonal { id: usize, max: usize },
    /// Stored value vector does not match the length of its diagonal
    #[error("Diagonal {id} has {found} values but its length is {expected}")]
    BadValueLength {
        id: usize,
        expected: usize,
        found: usize,
    },
    /// Diagonal ids and value vectors have different lengths
    #[error("Diagonal id and value arrays have incompatible lengths")]
    IncompatibleDimension,
    /// Diagonal ids are not strictly increasing
    #[error("Diagonal ids are not sorted in strictly increasing order")]
    BadDiagonalOrdering,
    /// A value can not be represented in the matrix element type
    #[error("Value can not be represented in the matrix element type")]
    Conversion,
}

/// Error type returned by the multiply kernels.
#[derive(Error, Debug)]
pub enum MultiplyError {
    #[error("Incompatible dimensions: ({arows} x {acols}) * ({brows} x {bcols}) into ({crows} x {ccols})")]
    /// Operand and destination dimensions do not agree
    IncompatibleDimension {
        arows: usize,
        acols: usize,
        brows: usize,
        bcols: usize,
        crows: usize,
        ccols: usize,
    },
    #[error("Thread pool construction failed: {0}")]
    /// The worker pool could not be created
    ThreadPool(String),
    #[error(transparent)]
    /// Invalid multiply settings
    Settings(#[from] SettingsError),
}

/// Error type returned by settings validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// An error that occurs when a field has an invalid value.
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}
