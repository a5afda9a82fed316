//! Deterministic random matrices.

use rand::{Rng, SeedableRng};

use super::Matrix;
use crate::rng::{Canonical, Mt64};

/// Fills an `n × n` matrix with uniform values in `[0, 1)`.
///
/// Values are drawn in row-major order (row outer, column inner). The
/// draw order is part of the output: the same generator state always
/// produces the same matrix, bit for bit.
///
/// The generator is taken by value; each matrix gets its own stream.
///
/// # Panics
///
/// Panics if `n == 0`.
pub fn random_matrix<R: Rng>(n: usize, mut rng: R) -> Matrix {
    assert!(n >= 1, "matrix dimension must be at least 1");

    let mut data = Vec::with_capacity(n * n);
    for _i in 0..n {
        for _j in 0..n {
            data.push(rng.sample(Canonical));
        }
    }
    Matrix::from_vec(n, data)
}

impl Matrix {
    /// `n × n` matrix from an [`Mt64`] stream seeded with `seed`.
    ///
    /// ```
    /// use matbench::Matrix;
    ///
    /// assert_eq!(Matrix::random(8, 123), Matrix::random(8, 123));
    /// assert_ne!(Matrix::random(8, 123), Matrix::random(8, 124));
    /// ```
    pub fn random(n: usize, seed: u64) -> Self {
        random_matrix(n, Mt64::seed_from_u64(seed))
    }
}

/// The two multiplicands of a benchmark: A from `seed`, B from `seed + 1`.
pub fn operands(n: usize, seed: u64) -> (Matrix, Matrix) {
    (Matrix::random(n, seed), Matrix::random(n, seed.wrapping_add(1)))
}
