use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Owned 1-D buffer. Serializes as a plain JSON array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Array1<T> {
    values: Vec<T>,
}

impl<T> Array1<T> {
    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        self.values.as_slice()
    }

    pub fn mapv<U, F>(&self, f: F) -> Array1<U>
    where
        F: FnMut(&T) -> U,
    {
        self.values.iter().map(f).collect()
    }

    /// Gather the elements at `indices`, in that order. Applying an
    /// `argsort` permutation this way reproduces the sorted values.
    ///
    /// Panics if an index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Array1<T>
    where
        T: Clone,
    {
        indices.iter().map(|&i| self.values[i].clone()).collect()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.values.clone()
    }
}

impl<T> From<Vec<T>> for Array1<T> {
    fn from(values: Vec<T>) -> Self {
        Self { values }
    }
}

impl<T> From<Array1<T>> for Vec<T> {
    fn from(array: Array1<T>) -> Self {
        array.values
    }
}

impl<T> FromIterator<T> for Array1<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<T> Index<usize> for Array1<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.values[i]
    }
}

/// Renders as `[a, b, c]`.
impl<T: fmt::Display> fmt::Display for Array1<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut first = true;
        for value in &self.values {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}
