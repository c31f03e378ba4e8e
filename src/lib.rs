//! __diagmat__ is a compact storage format for matrices whose nonzero entries
//! lie on a small, explicitly known set of diagonals.  Unlike classical band
//! matrices the stored diagonals may be arbitrarily spaced, e.g. a matrix with
//! nonzeros only on the main diagonal and on the 40th and 700th super-diagonals
//! stores exactly those three vectors and nothing else.
//!
//! Diagonals are identified by an integer id
//!
//! $$
//! k = m - i + j, \qquad 1 \le k \le m + n - 1
//! $$
//!
//! for an $m \times n$ matrix, so that $k = m$ is the main diagonal, $k < m$
//! are sub-diagonals and $k > m$ are super-diagonals.   Element coordinates
//! are zero-based throughout.
//!
//! The crate provides element access, whole-diagonal assignment and four
//! matrix multiplication kernels, all of the form
//!
//! $$
//! C \leftarrow \beta C + \alpha A B
//! $$
//!
//! for the operand combinations sparse·dense, dense·sparse, sparse·sparse
//! with sparse output and sparse·sparse with dense output.   The kernels
//! process stored diagonals one at a time and fan the entries of each
//! diagonal out across a [rayon](https://docs.rs/rayon) thread pool.
//!
//! ```no_run
//! use diagmat::algebra::*;
//!
//! // tridiagonal 4 x 4 matrix
//! let mut A = DiagonalMatrix::<f64>::new(4, 4);
//! A.setdiagonal(&[2.0, 2.0, 2.0, 2.0], true).unwrap();
//! A.setdiagonal(&[-1.0, -1.0, -1.0], true).unwrap();
//! A.setdiagonal(&[-1.0, -1.0, -1.0], false).unwrap();
//!
//! let B = Matrix::<f64>::identity(4);
//! let mut C = Matrix::<f64>::zeros((4, 4));
//! C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
//! assert_eq!(C[(1, 0)], -1.0);
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

pub mod algebra;
