//! numkernel: stable ordering and axis-aware reductions over rectangular arrays.
//!
//! Input is classified once into an [`Array`] (a vector or a rectangular
//! matrix) and then handed to one of the engines:
//!
//! * ordering: [`sort`], [`argsort`], [`argmin`], [`argmax`];
//! * reductions: [`mean`], [`variance`], [`std`], [`covariance`], plus
//!   [`max_occurence`] and [`sigmoid`];
//! * linear algebra: [`dot`], [`power`], [`subtract`], [`divide`], [`sum`],
//!   [`transpose`], [`least_squares`], [`eigen_solve`].
//!
//! Every operation is a pure function of its input. The free functions below
//! use a default [`Kernel`]; build one from a [`KernelConfig`] to control
//! when per-row/per-column work is spread over the rayon pool.
//!
//! ```
//! use numkernel::{Array, Axis};
//!
//! let v = Array::from_vector(vec![-5, 3, 10, 2, 1, -1]).unwrap();
//! let order = numkernel::argsort(&v, Axis::Rows).unwrap();
//! assert_eq!(order.as_vector().unwrap().to_vec(), vec![0, 5, 4, 3, 1, 2]);
//! ```
pub mod config;
pub mod error;
pub mod kernel;
pub mod linalg;
pub mod logging;
pub mod math;
pub mod ordering;
pub mod shape;
pub mod stats;

pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use kernel::Kernel;
pub use linalg::{Eigen, Product};
pub use math::{Array1, Array2};
pub use shape::{Array, Axis, Reduction};

pub fn sort(array: &Array, axis: Axis) -> Result<Array> {
    Kernel::default().sort(array, axis)
}

pub fn argsort(array: &Array, axis: Axis) -> Result<Array<usize>> {
    Kernel::default().argsort(array, axis)
}

pub fn argmin(array: &Array, axis: Axis) -> Result<Reduction<usize>> {
    Kernel::default().argmin(array, axis)
}

pub fn argmax(array: &Array, axis: Axis) -> Result<Reduction<usize>> {
    Kernel::default().argmax(array, axis)
}

pub fn mean(array: &Array, axis: Axis) -> Result<Reduction<f64>> {
    Kernel::default().mean(array, axis)
}

pub fn variance(array: &Array, ddof: usize, axis: Axis) -> Result<Reduction<f64>> {
    Kernel::default().variance(array, ddof, axis)
}

pub fn std(array: &Array, ddof: usize, axis: Axis) -> Result<Reduction<f64>> {
    Kernel::default().std(array, ddof, axis)
}

pub fn covariance(array: &Array) -> Result<Array> {
    Kernel::default().covariance(array)
}

pub fn max_occurence(array: &Array) -> Result<f64> {
    Kernel::default().max_occurence(array)
}

pub fn sigmoid(array: &Array) -> Result<Array1<f64>> {
    Kernel::default().sigmoid(array)
}

pub fn dot(a: &Array, b: &Array) -> Result<Product> {
    Kernel::default().dot(a, b)
}

pub fn power(array: &Array, p: i32) -> Result<Array> {
    Kernel::default().power(array, p)
}

pub fn subtract(a: &Array, b: &Array) -> Result<Array> {
    Kernel::default().subtract(a, b)
}

pub fn divide(array: &Array, divisor: f64) -> Result<Array> {
    Kernel::default().divide(array, divisor)
}

pub fn sum(array: &Array) -> Result<f64> {
    Kernel::default().sum(array)
}

pub fn transpose(array: &Array) -> Result<Array> {
    Kernel::default().transpose(array)
}

pub fn least_squares(x: &Array, y: &Array) -> Result<Array1<f64>> {
    Kernel::default().least_squares(x, y)
}

pub fn eigen_solve(array: &Array, tolerance: f64, max_iterations: usize) -> Result<Eigen> {
    Kernel::default().eigen_solve(array, tolerance, max_iterations)
}
