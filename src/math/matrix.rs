use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::math::vector::Array1;

/// Dense row-major matrix. Element `(r, c)` lives at `r * ncols + c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    values: Vec<T>,
    dims: (usize, usize),
}

/// A buffer whose length does not match the requested `(rows, cols)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    dims: (usize, usize),
    found: usize,
}

impl<T> Array2<T> {
    pub fn from_shape_vec(dims: (usize, usize), values: Vec<T>) -> Result<Self, ShapeError> {
        if values.len() != dims.0 * dims.1 {
            return Err(ShapeError {
                dims,
                found: values.len(),
            });
        }
        Ok(Self { values, dims })
    }

    pub fn nrows(&self) -> usize {
        self.dims.0
    }

    pub fn ncols(&self) -> usize {
        self.dims.1
    }

    pub fn shape(&self) -> (usize, usize) {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row-major backing buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Contiguous view of row `r`.
    pub fn row_slice(&self, r: usize) -> &[T] {
        let width = self.ncols();
        &self.values[r * width..(r + 1) * width]
    }

    /// Copy of column `c`, top to bottom. Columns are strided in the row-major
    /// buffer, so unlike rows they cannot be borrowed.
    pub fn column(&self, c: usize) -> Array1<T>
    where
        T: Clone,
    {
        self.values
            .iter()
            .skip(c)
            .step_by(self.ncols().max(1))
            .take(self.nrows())
            .cloned()
            .collect()
    }

    pub fn mapv<U, F>(&self, f: F) -> Array2<U>
    where
        F: FnMut(&T) -> U,
    {
        Array2 {
            values: self.values.iter().map(f).collect(),
            dims: self.dims,
        }
    }

    pub fn transpose(&self) -> Array2<T>
    where
        T: Clone,
    {
        let (rows, cols) = self.dims;
        let values = (0..cols)
            .flat_map(|c| (0..rows).map(move |r| (r, c)))
            .map(|idx| self[idx].clone())
            .collect();
        Array2 {
            values,
            dims: (cols, rows),
        }
    }

    /// Copy out the rows as nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        (0..self.nrows()).map(|r| self.row_slice(r).to_vec()).collect()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.values.clone()
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.values[r * self.dims.1 + c]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        &mut self.values[r * self.dims.1 + c]
    }
}

/// Renders one bracketed row per line, e.g. `[[1, 2],\n [3, 4]]`.
impl<T: fmt::Display> fmt::Display for Array2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for r in 0..self.nrows() {
            if r > 0 {
                f.write_str(",\n ")?;
            }
            f.write_str("[")?;
            for (c, value) in self.row_slice(r).iter().enumerate() {
                if c > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", value)?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot shape {} values into a {}x{} matrix",
            self.found, self.dims.0, self.dims.1
        )
    }
}

impl Error for ShapeError {}
