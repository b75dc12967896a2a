//! Small dense symmetric-matrix helpers for Mahalanobis scoring.
//!
//! The windows involved are tiny (floor(sqrt(L)) wide), so plain
//! `Vec<Vec<f64>>` arithmetic is enough; no linear-algebra crate is pulled
//! in for this.

const PIVOT_EPS: f64 = 1e-12;

/// Sample covariance (ddof = 1) of `rows`, treating each row as one
/// observation of an m-dimensional vector. Caller guarantees at least two
/// rows of equal length.
pub(crate) fn sample_covariance(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = rows.len();
    let m = rows[0].len();

    let mut means = vec![0.0; m];
    for row in rows {
        for (j, &v) in row.iter().enumerate() {
            means[j] += v;
        }
    }
    for mean in &mut means {
        *mean /= n as f64;
    }

    let mut cov = vec![vec![0.0; m]; m];
    for row in rows {
        for i in 0..m {
            let di = row[i] - means[i];
            for j in i..m {
                cov[i][j] += di * (row[j] - means[j]);
            }
        }
    }
    let divisor = (n - 1) as f64;
    for i in 0..m {
        for j in i..m {
            cov[i][j] /= divisor;
            cov[j][i] = cov[i][j];
        }
    }
    cov
}

/// Gauss-Jordan inverse with partial pivoting. Returns `None` when the
/// matrix is singular to working precision.
pub(crate) fn inverse(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut inv = identity(n);

    for col in 0..n {
        // Pick the largest pivot below the diagonal
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if a[pivot_row][col].abs() < PIVOT_EPS {
            return None;
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..n {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}

/// Moore-Penrose pseudo-inverse of a symmetric matrix via Jacobi
/// eigendecomposition: eigenvalues below tolerance are dropped.
pub(crate) fn pseudo_inverse(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = matrix.len();
    let (eigenvalues, eigenvectors) = jacobi_eigen(matrix);

    let max_abs = eigenvalues.iter().fold(0.0_f64, |acc, &e| acc.max(e.abs()));
    let tol = max_abs * n as f64 * PIVOT_EPS;

    let mut result = vec![vec![0.0; n]; n];
    for (k, &lambda) in eigenvalues.iter().enumerate() {
        if lambda.abs() <= tol {
            continue;
        }
        let inv_lambda = 1.0 / lambda;
        for i in 0..n {
            let vik = eigenvectors[i][k];
            if vik == 0.0 {
                continue;
            }
            for j in 0..n {
                result[i][j] += vik * inv_lambda * eigenvectors[j][k];
            }
        }
    }
    result
}

/// Mahalanobis distance between `x` and `y` given an inverse covariance
/// `vi`: sqrt((x-y)^T VI (x-y)). Rounding can push the quadratic form
/// slightly negative; it is clamped to zero.
pub(crate) fn mahalanobis(x: &[f64], y: &[f64], vi: &[Vec<f64>]) -> f64 {
    let m = x.len();
    let diff: Vec<f64> = (0..m).map(|i| x[i] - y[i]).collect();

    let mut quad = 0.0;
    for i in 0..m {
        let mut row_dot = 0.0;
        for j in 0..m {
            row_dot += vi[i][j] * diff[j];
        }
        quad += diff[i] * row_dot;
    }
    quad.max(0.0).sqrt()
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    let mut eye = vec![vec![0.0; n]; n];
    for (i, row) in eye.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    eye
}

/// Cyclic Jacobi eigendecomposition of a symmetric matrix. Returns
/// eigenvalues and the eigenvector matrix (eigenvectors as columns).
fn jacobi_eigen(matrix: &[Vec<f64>]) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = matrix.len();
    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut v = identity(n);

    for _sweep in 0..100 {
        let mut off_diag = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                off_diag += a[i][j] * a[i][j];
            }
        }
        if off_diag < 1e-22 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q].abs() < 1e-30 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = if theta >= 0.0 {
                    1.0 / (theta + (theta * theta + 1.0).sqrt())
                } else {
                    -1.0 / (-theta + (theta * theta + 1.0).sqrt())
                };
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[k][p];
                    let akq = a[k][q];
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p][k];
                    let aqk = a[q][k];
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[k][p];
                    let vkq = v[k][q];
                    v[k][p] = c * vkp - s * vkq;
                    v[k][q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let eigenvalues = (0..n).map(|i| a[i][i]).collect();
    (eigenvalues, v)
}
