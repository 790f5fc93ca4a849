//! Reduction engine: mean, variance, standard deviation and covariance.
//!
//! Every reduction follows the same axis convention:
//!
//! * a vector always collapses to a scalar (the axis is ignored);
//! * axis 0 reduces down each column of a matrix, yielding one value per column;
//! * axis 1 reduces across each row, yielding one value per row;
//! * `Axis::Flat` on a matrix is only defined for [`Kernel::mean`], as the
//!   mean of the column means. Variance and standard deviation refuse it.
//!
//! Variance is computed in two passes (center on the lane mean, then sum the
//! squared deviations), and covariance centers each feature column once before
//! accumulating the pairwise products.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::{KernelError, Result};
use crate::kernel::Kernel;
use crate::math::{Array1, Array2};
use crate::shape::{ensure_non_empty, lane_dims, map_lanes, Array, Axis, Lane, Reduction};

pub(crate) fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of squared deviations from the mean, divided by `n - ddof`.
///
/// Callers must have checked `n > ddof` via [`check_dof`].
fn variance_of(values: &[f64], ddof: usize) -> f64 {
    let mean = mean_of(values);
    let sum_sq: f64 = values.iter().map(|&x| (x - mean) * (x - mean)).sum();
    sum_sq / (values.len() - ddof) as f64
}

fn check_dof(operation: &'static str, n: usize, ddof: usize) -> Result<()> {
    if ddof >= n {
        return Err(KernelError::domain(
            operation,
            format!(
                "degrees of freedom ({}) must be smaller than the number of samples ({})",
                ddof, n
            ),
        ));
    }
    Ok(())
}

impl Kernel {
    /// Arithmetic mean.
    ///
    /// # Arguments
    ///
    /// * `array` - A vector or matrix.
    /// * `axis` - `Axis::Rows` for per-column means, `Axis::Columns` for per-row
    ///   means, `Axis::Flat` for a single scalar (mean of the column means).
    ///
    /// # Returns
    ///
    /// A scalar for vectors and for `Axis::Flat`, otherwise one value per lane.
    pub fn mean(&self, array: &Array, axis: Axis) -> Result<Reduction<f64>> {
        ensure_non_empty("mean", array)?;
        match array {
            Array::Vector(v) => Ok(Reduction::Scalar(mean_of(v.as_slice()))),
            Array::Matrix(m) => match axis.lane() {
                Some(lane) => {
                    let means = map_lanes(m, lane, self.parallel_for(m.len()), mean_of);
                    Ok(Reduction::Vector(Array1::from_vec(means)))
                }
                None => {
                    let column_means = self.mean(array, Axis::Rows)?;
                    Ok(Reduction::Scalar(match column_means {
                        Reduction::Vector(means) => mean_of(means.as_slice()),
                        Reduction::Scalar(value) => value,
                    }))
                }
            },
        }
    }

    /// Variance with `ddof` degrees-of-freedom correction:
    /// `sum((x - mean)^2) / (n - ddof)` along `axis`.
    ///
    /// Fails with [`KernelError::Domain`] when `ddof >= n`, and with
    /// [`KernelError::Unsupported`] for `Axis::Flat` on a matrix.
    pub fn variance(&self, array: &Array, ddof: usize, axis: Axis) -> Result<Reduction<f64>> {
        self.dispersion("variance", array, ddof, axis)
    }

    /// Standard deviation, the square root of [`Kernel::variance`], with the
    /// same axis constraints.
    pub fn std(&self, array: &Array, ddof: usize, axis: Axis) -> Result<Reduction<f64>> {
        Ok(self.dispersion("std", array, ddof, axis)?.map(f64::sqrt))
    }

    fn dispersion(
        &self,
        operation: &'static str,
        array: &Array,
        ddof: usize,
        axis: Axis,
    ) -> Result<Reduction<f64>> {
        ensure_non_empty(operation, array)?;
        match array {
            Array::Vector(v) => {
                check_dof(operation, v.len(), ddof)?;
                Ok(Reduction::Scalar(variance_of(v.as_slice(), ddof)))
            }
            Array::Matrix(m) => {
                let lane = axis.lane().ok_or(KernelError::Unsupported {
                    operation,
                    reason: "axis=None is not implemented for a matrix; use axis 0 or 1",
                })?;
                let (_, lane_len) = lane_dims(m, lane);
                check_dof(operation, lane_len, ddof)?;
                let values = map_lanes(m, lane, self.parallel_for(m.len()), |lane_values| {
                    variance_of(lane_values, ddof)
                });
                Ok(Reduction::Vector(Array1::from_vec(values)))
            }
        }
    }

    /// Population covariance matrix of a `(samples, features)` matrix.
    ///
    /// Entry `(i, j)` is `sum((x_i - mean_i) * (x_j - mean_j)) / n`. Only the
    /// upper triangle is accumulated; the lower one is mirrored from it, so
    /// the result is exactly symmetric.
    pub fn covariance(&self, array: &Array) -> Result<Array> {
        const OP: &str = "covariance";

        ensure_non_empty(OP, array)?;
        let m = array.as_matrix().ok_or_else(|| {
            KernelError::type_error(OP, "expected a (samples, features) matrix, got a vector")
        })?;
        let (samples, features) = m.shape();
        log::debug!("covariance of {} samples x {} features", samples, features);

        let parallel = self.parallel_for(samples * features * features);
        let centered: Vec<Vec<f64>> = map_lanes(m, Lane::Column, parallel, |col| {
            let mean = mean_of(col);
            col.iter().map(|&x| x - mean).collect()
        });

        let n = samples as f64;
        let upper_row = |i: usize| -> Vec<f64> {
            (i..features)
                .map(|j| {
                    centered[i]
                        .iter()
                        .zip(centered[j].iter())
                        .map(|(a, b)| a * b)
                        .sum::<f64>()
                        / n
                })
                .collect()
        };
        let upper: Vec<Vec<f64>> = if parallel {
            (0..features).into_par_iter().map(upper_row).collect()
        } else {
            (0..features).map(upper_row).collect()
        };

        let mut cov = Array2::from_shape_vec((features, features), vec![0.0; features * features])?;
        for (i, row) in upper.iter().enumerate() {
            for (offset, &value) in row.iter().enumerate() {
                let j = i + offset;
                cov[(i, j)] = value;
                cov[(j, i)] = value;
            }
        }
        Ok(Array::Matrix(cov))
    }

    /// Most frequent element of a vector.
    ///
    /// Ties go to the value whose first occurrence comes earliest. `0.0` and
    /// `-0.0` count as the same value.
    pub fn max_occurence(&self, array: &Array) -> Result<f64> {
        const OP: &str = "max_occurence";

        ensure_non_empty(OP, array)?;
        let v = array
            .as_vector()
            .ok_or_else(|| KernelError::type_error(OP, "expected a vector, got a matrix"))?;

        // Insertion-ordered counting table: slot order is first-seen order.
        let mut slots: Vec<(f64, usize)> = Vec::new();
        let mut lookup: HashMap<u64, usize> = HashMap::new();
        for &value in v.iter() {
            let key = (if value == 0.0 { 0.0f64 } else { value }).to_bits();
            match lookup.get(&key) {
                Some(&slot) => slots[slot].1 += 1,
                None => {
                    lookup.insert(key, slots.len());
                    slots.push((value, 1));
                }
            }
        }

        let mut best = 0;
        for (slot, &(_, count)) in slots.iter().enumerate() {
            if count > slots[best].1 {
                best = slot;
            }
        }
        Ok(slots[best].0)
    }

    /// Elementwise logistic function `1 / (1 + e^{-v})` over a vector.
    pub fn sigmoid(&self, array: &Array) -> Result<Array1<f64>> {
        ensure_non_empty("sigmoid", array)?;
        let v = array.as_vector().ok_or_else(|| {
            KernelError::type_error("sigmoid", "expected a vector, got a matrix")
        })?;
        Ok(v.mapv(|&x| 1.0 / (1.0 + (-x).exp())))
    }
}
