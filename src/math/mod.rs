//! Owned, row-major containers backing the kernel's array model.
//!
//! `Array1` is a 1-D vector and `Array2` a dense 2-D matrix. Both are plain
//! `Vec`-backed values with no views or strides: every operation in the
//! crate returns a freshly allocated container.
pub mod matrix;
pub mod vector;

pub use matrix::{Array2, ShapeError};
pub use vector::Array1;
