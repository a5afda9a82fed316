//! The benchmark kernel: naive triple loop in i-k-j order.

use super::Matrix;

/// Cache-friendly square matrix multiplication using i-k-j loop order.
///
/// With `k` in the middle, the innermost loop walks row `k` of B and
/// row `i` of C sequentially (stride 1) while `a[i][k]` stays in a
/// register. The loop order is what this benchmark measures, so it must
/// stay i-k-j: the textbook i-j-k order strides B column-wise and gives a
/// different, non-comparable profile.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Matrix B (n × n), row-major
/// * `c` - Matrix C (n × n), row-major, accumulated into (C += A * B)
/// * `n` - Dimension of all three matrices
#[allow(clippy::needless_range_loop)]
pub fn matmul_ikj(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        let c_row = &mut c[i * n..(i + 1) * n];
        for k in 0..n {
            let a_ik = a[i * n + k];
            let b_row = &b[k * n..(k + 1) * n];
            for j in 0..n {
                c_row[j] += a_ik * b_row[j];
            }
        }
    }
}

/// Matrix multiply: C = A * B into a freshly zeroed C.
///
/// Neither input is modified.
///
/// # Panics
///
/// Panics if A and B don't have the same dimension.
///
/// # Example
///
/// ```
/// use matbench::{Matrix, multiply};
///
/// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]);
/// let b = Matrix::from_rows(&[[5.0, 6.0], [7.0, 8.0]]);
///
/// let c = multiply(&a, &b);
/// assert_eq!(c, Matrix::from_rows(&[[19.0, 22.0], [43.0, 50.0]]));
/// ```
pub fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(
        a.n(),
        b.n(),
        "dimension mismatch: A is {}x{}, B is {}x{}",
        a.n(),
        a.n(),
        b.n(),
        b.n()
    );

    let n = a.n();
    let mut c = vec![0.0; n * n];
    matmul_ikj(a.as_slice(), b.as_slice(), &mut c, n);
    Matrix::from_vec(n, c)
}
