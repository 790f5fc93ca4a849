//! Shape dispatch: classification of caller input into a tagged `Array`.
//!
//! Input is inspected exactly once, here, and turned into either
//! `Array::Vector` or `Array::Matrix`. Everything downstream dispatches on
//! that tag and never re-inspects raw data. Validation happens before any
//! engine work begins:
//!
//! * empty sequences (outer or inner) fail with [`KernelError::Empty`];
//! * ragged rows, mixed scalars/sequences and non-numeric elements fail with
//!   [`KernelError::Type`].
//!
//! Integer inputs are promoted to `f64` through `num_traits::ToPrimitive`.

use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayBase, Data, Ix1, Ix2};
use num_traits::ToPrimitive;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KernelError, Result};
use crate::math::{Array1, Array2};

/// Dimension along which a matrix is ordered or reduced.
///
/// `Rows` (axis 0) runs down each column and yields one value per column;
/// `Columns` (axis 1) runs across each row and yields one value per row.
/// `Flat` means no axis: the whole matrix collapses to a single scalar.
/// Vectors ignore the axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Rows,
    Columns,
    Flat,
}

impl Axis {
    pub(crate) fn lane(self) -> Option<Lane> {
        match self {
            Axis::Rows => Some(Lane::Column),
            Axis::Columns => Some(Lane::Row),
            Axis::Flat => None,
        }
    }
}

impl TryFrom<i64> for Axis {
    type Error = KernelError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Axis::Rows),
            1 => Ok(Axis::Columns),
            other => Err(KernelError::type_error(
                "axis",
                format!("expected 0 or 1, got {}", other),
            )),
        }
    }
}

impl From<Option<Axis>> for Axis {
    fn from(value: Option<Axis>) -> Self {
        value.unwrap_or(Axis::Flat)
    }
}

impl FromStr for Axis {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "0" | "rows" => Ok(Axis::Rows),
            "1" | "columns" | "cols" => Ok(Axis::Columns),
            "none" | "flat" => Ok(Axis::Flat),
            other => Err(KernelError::type_error(
                "axis",
                format!("unknown axis '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "0"),
            Axis::Columns => write!(f, "1"),
            Axis::Flat => write!(f, "none"),
        }
    }
}

/// A 1-D slice of a matrix that an axis-wise operation runs over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lane {
    Column,
    Row,
}

/// A validated rectangular array: a non-empty vector or a non-empty matrix.
#[derive(Clone, Debug, PartialEq)]
pub enum Array<T = f64> {
    Vector(Array1<T>),
    Matrix(Array2<T>),
}

impl<T> Array<T> {
    /// Total number of elements.
    pub fn len(&self) -> usize {
        match self {
            Array::Vector(v) => v.len(),
            Array::Matrix(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(rows, cols)`; a vector reports a single row.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Array::Vector(v) => (1, v.len()),
            Array::Matrix(m) => m.shape(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Array::Vector(_) => "vector",
            Array::Matrix(_) => "matrix",
        }
    }

    pub fn as_vector(&self) -> Option<&Array1<T>> {
        match self {
            Array::Vector(v) => Some(v),
            Array::Matrix(_) => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Array2<T>> {
        match self {
            Array::Vector(_) => None,
            Array::Matrix(m) => Some(m),
        }
    }

    pub fn mapv<U, F>(&self, f: F) -> Array<U>
    where
        F: FnMut(&T) -> U,
    {
        match self {
            Array::Vector(v) => Array::Vector(v.mapv(f)),
            Array::Matrix(m) => Array::Matrix(m.mapv(f)),
        }
    }
}

impl Array<f64> {
    /// Build a vector, promoting every element to `f64`.
    pub fn from_vector<T: ToPrimitive>(values: Vec<T>) -> Result<Self> {
        if values.is_empty() {
            return Err(KernelError::Empty {
                operation: "from_vector",
            });
        }
        let data = promote("from_vector", values)?;
        log::debug!("classified input as vector of length {}", data.len());
        Ok(Array::Vector(Array1::from_vec(data)))
    }

    /// Build a matrix from rows, which must all have the same non-zero length.
    pub fn from_rows<T: ToPrimitive>(rows: Vec<Vec<T>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = match rows.first() {
            Some(first) => first.len(),
            None => {
                return Err(KernelError::Empty {
                    operation: "from_rows",
                })
            }
        };
        if ncols == 0 {
            return Err(KernelError::Empty {
                operation: "from_rows",
            });
        }

        let mut data = Vec::with_capacity(nrows * ncols);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != ncols {
                return Err(KernelError::type_error(
                    "from_rows",
                    format!(
                        "ragged matrix: row {} has {} elements, expected {}",
                        idx,
                        row.len(),
                        ncols
                    ),
                ));
            }
            data.extend(promote("from_rows", row)?);
        }
        log::debug!("classified input as {}x{} matrix", nrows, ncols);
        Ok(Array::Matrix(Array2::from_shape_vec((nrows, ncols), data)?))
    }

    /// Classify an arbitrary JSON value as a vector or matrix.
    ///
    /// The first element decides the expected kind; every other element must
    /// agree with it.
    pub fn from_json(value: &Value) -> Result<Self> {
        const OP: &str = "from_json";

        let items = value
            .as_array()
            .ok_or_else(|| KernelError::type_error(OP, "expected a sequence"))?;
        let first = items.first().ok_or(KernelError::Empty { operation: OP })?;

        match first {
            Value::Number(_) => {
                let values = items
                    .iter()
                    .map(|item| json_number(OP, item))
                    .collect::<Result<Vec<f64>>>()?;
                Array::from_vector(values)
            }
            Value::Array(_) => {
                let rows = items
                    .iter()
                    .map(|item| match item {
                        Value::Array(row) => row
                            .iter()
                            .map(|cell| json_number(OP, cell))
                            .collect::<Result<Vec<f64>>>(),
                        _ => Err(KernelError::type_error(
                            OP,
                            "mixed sequence of numbers and sequences",
                        )),
                    })
                    .collect::<Result<Vec<Vec<f64>>>>()?;
                Array::from_rows(rows)
            }
            other => Err(KernelError::type_error(
                OP,
                format!("expected numbers or numeric sequences, found {}", other),
            )),
        }
    }

    pub fn from_ndarray1<S, T>(array: &ArrayBase<S, Ix1>) -> Result<Self>
    where
        S: Data<Elem = T>,
        T: ToPrimitive + Copy,
    {
        Array::from_vector(array.iter().copied().collect::<Vec<T>>())
    }

    pub fn from_ndarray2<S, T>(array: &ArrayBase<S, Ix2>) -> Result<Self>
    where
        S: Data<Elem = T>,
        T: ToPrimitive + Copy,
    {
        let rows: Vec<Vec<T>> = array
            .outer_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        Array::from_rows(rows)
    }

    /// Render as nested JSON arrays (the inverse of [`Array::from_json`]).
    pub fn to_json(&self) -> Value {
        match self {
            Array::Vector(v) => Value::from(v.to_vec()),
            Array::Matrix(m) => Value::from(m.to_rows()),
        }
    }
}

impl<T: Clone> Array<T> {
    /// Materialize as a 2-D `ndarray` array; a vector becomes a single row.
    pub fn to_ndarray(&self) -> ndarray::Array2<T> {
        match self {
            Array::Vector(v) => ndarray::Array2::from_shape_fn((1, v.len()), |(_, c)| v[c].clone()),
            Array::Matrix(m) => ndarray::Array2::from_shape_fn(m.shape(), |(r, c)| m[(r, c)].clone()),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Array::Vector(v) => write!(f, "{}", v),
            Array::Matrix(m) => write!(f, "{}", m),
        }
    }
}

/// Result of an operation that collapses a vector to a scalar, or a matrix to
/// one value per row/column.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reduction<T> {
    Scalar(T),
    Vector(Array1<T>),
}

impl<T: Copy> Reduction<T> {
    pub fn as_scalar(&self) -> Option<T> {
        match self {
            Reduction::Scalar(v) => Some(*v),
            Reduction::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Array1<T>> {
        match self {
            Reduction::Scalar(_) => None,
            Reduction::Vector(v) => Some(v),
        }
    }

    pub fn map<U, F>(&self, mut f: F) -> Reduction<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            Reduction::Scalar(v) => Reduction::Scalar(f(*v)),
            Reduction::Vector(v) => Reduction::Vector(v.mapv(|x| f(*x))),
        }
    }
}

fn promote<T: ToPrimitive>(operation: &'static str, values: Vec<T>) -> Result<Vec<f64>> {
    values
        .into_iter()
        .map(|v| {
            v.to_f64()
                .ok_or_else(|| KernelError::type_error(operation, "value is not representable as f64"))
        })
        .collect()
}

fn json_number(operation: &'static str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| KernelError::type_error(operation, format!("{} is not a finite number", n))),
        Value::Array(_) => Err(KernelError::type_error(
            operation,
            "mixed sequence of numbers and sequences",
        )),
        other => Err(KernelError::type_error(
            operation,
            format!("expected a number, found {}", other),
        )),
    }
}

/// Engine-side guard for arrays assembled directly from their variants,
/// bypassing the validating constructors.
pub(crate) fn ensure_non_empty<T>(operation: &'static str, array: &Array<T>) -> Result<()> {
    if array.is_empty() {
        return Err(KernelError::Empty { operation });
    }
    Ok(())
}

/// Number of lanes of `matrix` along `lane`, and the length of each.
pub(crate) fn lane_dims<T>(matrix: &Array2<T>, lane: Lane) -> (usize, usize) {
    match lane {
        Lane::Column => (matrix.ncols(), matrix.nrows()),
        Lane::Row => (matrix.nrows(), matrix.ncols()),
    }
}

/// Apply `f` to every row or column of `matrix`, in lane order.
///
/// Each lane is processed sequentially by `f`; with `parallel` the lanes are
/// distributed over the rayon pool, which leaves the output identical.
pub(crate) fn map_lanes<R, F>(matrix: &Array2<f64>, lane: Lane, parallel: bool, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(&[f64]) -> R + Sync + Send,
{
    let (count, _) = lane_dims(matrix, lane);
    let run = |i: usize| match lane {
        Lane::Row => f(matrix.row_slice(i)),
        Lane::Column => f(matrix.column(i).as_slice()),
    };
    if parallel {
        (0..count).into_par_iter().map(run).collect()
    } else {
        (0..count).map(run).collect()
    }
}

/// Reassemble per-lane outputs (each as long as the lane) into a matrix of
/// `shape`.
pub(crate) fn assemble_lanes<T: Clone>(
    lanes: Vec<Vec<T>>,
    lane: Lane,
    shape: (usize, usize),
) -> Result<Array2<T>> {
    let (nrows, ncols) = shape;
    let data = match lane {
        Lane::Row => lanes.into_iter().flatten().collect(),
        Lane::Column => {
            let mut data = Vec::with_capacity(nrows * ncols);
            for r in 0..nrows {
                for column in lanes.iter() {
                    data.push(column[r].clone());
                }
            }
            data
        }
    };
    Ok(Array2::from_shape_vec(shape, data)?)
}
