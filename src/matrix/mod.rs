//! Square matrices, their deterministic generation and the benchmark kernel.
//!
//! Everything here is row-major and square: the harness only ever
//! multiplies two `n × n` matrices of the same `n`.

pub mod naive_ikj;
pub mod random;

use std::ops::Index;

/// Dense `n × n` matrix of `f64`, stored row-major in one allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `n × n` matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Wraps row-major `data` as an `n × n` matrix.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != n * n`.
    pub fn from_vec(n: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            n * n,
            "expected {}x{}={} elements, got {}",
            n,
            n,
            n * n,
            data.len()
        );
        Self { n, data }
    }

    /// Builds a matrix from nested rows.
    ///
    /// ```
    /// use matbench::Matrix;
    ///
    /// let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]);
    /// assert_eq!(m[(1, 0)], 3.0);
    /// ```
    pub fn from_rows<const N: usize>(rows: &[[f64; N]; N]) -> Self {
        Self::from_vec(N, rows.iter().flatten().copied().collect())
    }

    /// Dimension `n`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// All `n * n` entries, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Row `i` as a slice of `n` values.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Sum of all entries. Used to keep the product observable.
    pub fn checksum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// `self × other` with the fixed i-k-j kernel.
    ///
    /// See [`naive_ikj::multiply`].
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        naive_ikj::multiply(self, other)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.n + j]
    }
}
