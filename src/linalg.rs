//! Linear-algebra primitives over the same `Array` model as the engines.
//!
//! Products, elementwise arithmetic, transpose, least squares via the normal
//! equations, and a cyclic Jacobi eigendecomposition for symmetric matrices.

use crate::error::{KernelError, Result};
use crate::kernel::Kernel;
use crate::math::{Array1, Array2};
use crate::ordering::sort_lane;
use crate::shape::{assemble_lanes, ensure_non_empty, map_lanes, Array, Lane};

/// Relative tolerance used to decide whether a matrix is symmetric.
const SYMMETRY_EPS: f64 = 1e-9;

/// Result of [`Kernel::dot`].
#[derive(Clone, Debug, PartialEq)]
pub enum Product {
    Scalar(f64),
    Vector(Array1<f64>),
    Matrix(Array2<f64>),
}

impl Product {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Product::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

/// Eigenpairs of a symmetric matrix.
#[derive(Clone, Debug)]
pub struct Eigen {
    /// Eigenvalues in descending order.
    pub values: Array1<f64>,
    /// Column `j` is the unit eigenvector for `values[j]`.
    pub vectors: Array2<f64>,
    /// Jacobi sweeps performed.
    pub sweeps: usize,
}

fn dot_slices(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn mismatch(operation: &'static str, expected: (usize, usize), got: (usize, usize)) -> KernelError {
    KernelError::ShapeMismatch {
        operation,
        expected,
        got,
    }
}

fn expect_matrix<'a>(operation: &'static str, array: &'a Array) -> Result<&'a Array2<f64>> {
    array
        .as_matrix()
        .ok_or_else(|| KernelError::type_error(operation, "expected a matrix, got a vector"))
}

/// Solve `a * x = b` for square `a` by Gaussian elimination with partial
/// pivoting. `a` is row-major `n x n`.
fn solve_dense(operation: &'static str, mut a: Vec<f64>, mut b: Vec<f64>, n: usize) -> Result<Vec<f64>> {
    let scale = a.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let threshold = f64::EPSILON * scale * n as f64;
    if scale == 0.0 {
        return Err(KernelError::Singular { operation });
    }

    for k in 0..n {
        let mut pivot_row = k;
        for i in (k + 1)..n {
            if a[i * n + k].abs() > a[pivot_row * n + k].abs() {
                pivot_row = i;
            }
        }
        if a[pivot_row * n + k].abs() <= threshold {
            return Err(KernelError::Singular { operation });
        }
        if pivot_row != k {
            for j in 0..n {
                a.swap(k * n + j, pivot_row * n + j);
            }
            b.swap(k, pivot_row);
        }

        let pivot = a[k * n + k];
        for i in (k + 1)..n {
            let factor = a[i * n + k] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[i * n + j] -= factor * a[k * n + j];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = ((i + 1)..n).map(|j| a[i * n + j] * x[j]).sum();
        x[i] = (b[i] - tail) / a[i * n + i];
    }
    Ok(x)
}

fn off_diagonal_norm(s: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for p in 0..n {
        for q in (p + 1)..n {
            sum += s[p * n + q] * s[p * n + q];
        }
    }
    sum.sqrt()
}

/// One cyclic sweep of Jacobi rotations over the upper triangle of `s`,
/// accumulating the rotations into `v`.
fn jacobi_sweep(s: &mut [f64], v: &mut [f64], n: usize) {
    for p in 0..n {
        for q in (p + 1)..n {
            let apq = s[p * n + q];
            if apq == 0.0 {
                continue;
            }
            let app = s[p * n + p];
            let aqq = s[q * n + q];

            let theta = (aqq - app) / (2.0 * apq);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let sn = t * c;

            s[p * n + p] = app - t * apq;
            s[q * n + q] = aqq + t * apq;
            s[p * n + q] = 0.0;
            s[q * n + p] = 0.0;
            for r in 0..n {
                if r == p || r == q {
                    continue;
                }
                let arp = s[r * n + p];
                let arq = s[r * n + q];
                let new_rp = c * arp - sn * arq;
                let new_rq = sn * arp + c * arq;
                s[r * n + p] = new_rp;
                s[p * n + r] = new_rp;
                s[r * n + q] = new_rq;
                s[q * n + r] = new_rq;
            }
            for r in 0..n {
                let vp = v[r * n + p];
                let vq = v[r * n + q];
                v[r * n + p] = c * vp - sn * vq;
                v[r * n + q] = sn * vp + c * vq;
            }
        }
    }
}

impl Kernel {
    /// Inner product.
    ///
    /// * vector · vector → scalar
    /// * matrix `(r, k)` · vector `k` → vector `r`
    /// * vector `r` · matrix `(r, c)` → vector `c` (the vector acts as one row)
    /// * matrix `(r, k)` · matrix `(k, c)` → matrix `(r, c)`
    pub fn dot(&self, a: &Array, b: &Array) -> Result<Product> {
        const OP: &str = "dot";

        ensure_non_empty(OP, a)?;
        ensure_non_empty(OP, b)?;
        match (a, b) {
            (Array::Vector(x), Array::Vector(y)) => {
                if x.len() != y.len() {
                    return Err(mismatch(OP, (1, x.len()), (1, y.len())));
                }
                Ok(Product::Scalar(dot_slices(x.as_slice(), y.as_slice())))
            }
            (Array::Matrix(m), Array::Vector(y)) => {
                if m.ncols() != y.len() {
                    return Err(mismatch(OP, (m.ncols(), 1), (y.len(), 1)));
                }
                let values = map_lanes(m, Lane::Row, self.parallel_for(m.len()), |row| {
                    dot_slices(row, y.as_slice())
                });
                Ok(Product::Vector(Array1::from_vec(values)))
            }
            (Array::Vector(x), Array::Matrix(m)) => {
                if x.len() != m.nrows() {
                    return Err(mismatch(OP, (1, m.nrows()), (1, x.len())));
                }
                let values = map_lanes(m, Lane::Column, self.parallel_for(m.len()), |col| {
                    dot_slices(x.as_slice(), col)
                });
                Ok(Product::Vector(Array1::from_vec(values)))
            }
            (Array::Matrix(lhs), Array::Matrix(rhs)) => {
                if lhs.ncols() != rhs.nrows() {
                    return Err(mismatch(OP, (lhs.ncols(), rhs.ncols()), rhs.shape()));
                }
                let rhs_t = rhs.transpose();
                let parallel = self.parallel_for(lhs.nrows() * rhs.len());
                let rows = map_lanes(lhs, Lane::Row, parallel, |row| {
                    (0..rhs_t.nrows())
                        .map(|j| dot_slices(row, rhs_t.row_slice(j)))
                        .collect::<Vec<f64>>()
                });
                Ok(Product::Matrix(assemble_lanes(
                    rows,
                    Lane::Row,
                    (lhs.nrows(), rhs.ncols()),
                )?))
            }
        }
    }

    /// Raise every element to the integer power `p`.
    pub fn power(&self, array: &Array, p: i32) -> Result<Array> {
        ensure_non_empty("power", array)?;
        Ok(array.mapv(|&x| x.powi(p)))
    }

    /// Elementwise `a - b`; both operands must have the same kind and shape.
    pub fn subtract(&self, a: &Array, b: &Array) -> Result<Array> {
        const OP: &str = "subtract";

        ensure_non_empty(OP, a)?;
        ensure_non_empty(OP, b)?;
        match (a, b) {
            (Array::Vector(x), Array::Vector(y)) if x.len() == y.len() => Ok(Array::Vector(
                x.iter().zip(y.iter()).map(|(l, r)| l - r).collect(),
            )),
            (Array::Matrix(x), Array::Matrix(y)) if x.shape() == y.shape() => {
                let data = x
                    .as_slice()
                    .iter()
                    .zip(y.as_slice().iter())
                    .map(|(l, r)| l - r)
                    .collect();
                Ok(Array::Matrix(Array2::from_shape_vec(x.shape(), data)?))
            }
            _ => Err(mismatch(OP, a.shape(), b.shape())),
        }
    }

    /// Divide every element by `divisor`.
    pub fn divide(&self, array: &Array, divisor: f64) -> Result<Array> {
        const OP: &str = "divide";

        ensure_non_empty(OP, array)?;
        if divisor == 0.0 {
            return Err(KernelError::domain(OP, "division by zero"));
        }
        Ok(array.mapv(|&x| x / divisor))
    }

    /// Sum of every element.
    pub fn sum(&self, array: &Array) -> Result<f64> {
        ensure_non_empty("sum", array)?;
        Ok(match array {
            Array::Vector(v) => v.iter().sum(),
            Array::Matrix(m) => m.as_slice().iter().sum(),
        })
    }

    /// Swap rows and columns of a matrix. A vector has a single axis and is
    /// returned unchanged.
    pub fn transpose(&self, array: &Array) -> Result<Array> {
        ensure_non_empty("transpose", array)?;
        Ok(match array {
            Array::Vector(v) => Array::Vector(v.clone()),
            Array::Matrix(m) => Array::Matrix(m.transpose()),
        })
    }

    /// Ordinary least squares: the `theta` minimizing `|x * theta - y|^2`.
    ///
    /// # Arguments
    ///
    /// * `x` - A `(samples, features)` design matrix.
    /// * `y` - A vector with one target per sample.
    ///
    /// # Returns
    ///
    /// One coefficient per feature, obtained by solving `x^T x theta = x^T y`.
    pub fn least_squares(&self, x: &Array, y: &Array) -> Result<Array1<f64>> {
        const OP: &str = "least_squares";

        ensure_non_empty(OP, x)?;
        ensure_non_empty(OP, y)?;
        let design = expect_matrix(OP, x)?;
        let target = y
            .as_vector()
            .ok_or_else(|| KernelError::type_error(OP, "expected a target vector, got a matrix"))?;
        let (samples, features) = design.shape();
        if samples != target.len() {
            return Err(mismatch(OP, (samples, 1), (target.len(), 1)));
        }

        let columns: Vec<Vec<f64>> =
            map_lanes(design, Lane::Column, self.parallel_for(design.len()), |c| c.to_vec());
        let mut gram = vec![0.0; features * features];
        for i in 0..features {
            for j in i..features {
                let value = dot_slices(&columns[i], &columns[j]);
                gram[i * features + j] = value;
                gram[j * features + i] = value;
            }
        }
        let moments: Vec<f64> = columns
            .iter()
            .map(|col| dot_slices(col, target.as_slice()))
            .collect();

        log::debug!("solving {}x{} normal equations", features, features);
        Ok(Array1::from_vec(solve_dense(OP, gram, moments, features)?))
    }

    /// Jacobi eigendecomposition using the configured tolerance and sweep budget.
    pub fn eigen_solve_default(&self, array: &Array) -> Result<Eigen> {
        self.eigen_solve(
            array,
            self.config().eigen_tolerance,
            self.config().eigen_max_iterations,
        )
    }

    /// Eigenvalues and eigenvectors of a symmetric matrix by cyclic Jacobi
    /// rotations.
    ///
    /// Iterates until the off-diagonal Frobenius norm drops below `tolerance`.
    /// Fails with [`KernelError::NoConvergence`] if that takes more than
    /// `max_iterations` sweeps.
    pub fn eigen_solve(&self, array: &Array, tolerance: f64, max_iterations: usize) -> Result<Eigen> {
        const OP: &str = "eigen_solve";

        ensure_non_empty(OP, array)?;
        let m = expect_matrix(OP, array)?;
        let n = m.nrows();
        if m.ncols() != n {
            return Err(mismatch(OP, (n, n), m.shape()));
        }
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(KernelError::domain(OP, "tolerance must be positive"));
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let (upper, lower) = (m[(i, j)], m[(j, i)]);
                if (upper - lower).abs() > SYMMETRY_EPS * (1.0 + upper.abs().max(lower.abs())) {
                    return Err(KernelError::domain(
                        OP,
                        format!("matrix is not symmetric at ({}, {})", i, j),
                    ));
                }
            }
        }

        let mut s = m.to_vec();
        let mut v = vec![0.0; n * n];
        for i in 0..n {
            v[i * n + i] = 1.0;
        }

        let mut sweeps = 0;
        while off_diagonal_norm(&s, n) >= tolerance {
            if sweeps == max_iterations {
                return Err(KernelError::NoConvergence {
                    operation: OP,
                    iterations: sweeps,
                });
            }
            jacobi_sweep(&mut s, &mut v, n);
            sweeps += 1;
        }
        if sweeps * 4 > max_iterations * 3 {
            log::warn!(
                "eigen_solve used {} of {} sweeps; consider a looser tolerance",
                sweeps,
                max_iterations
            );
        }

        let diagonal: Vec<f64> = (0..n).map(|i| -s[i * n + i]).collect();
        let (_, order) = sort_lane(&diagonal);
        let values = order.iter().map(|&k| s[k * n + k]).collect();
        let mut vectors = Array2::from_shape_vec((n, n), vec![0.0; n * n])?;
        for (j, &k) in order.iter().enumerate() {
            for r in 0..n {
                vectors[(r, j)] = v[r * n + k];
            }
        }

        Ok(Eigen {
            values,
            vectors,
            sweeps,
        })
    }
}
