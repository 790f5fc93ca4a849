//! Ordering engine: stable sort with permutation tracking, argmin and argmax.
//!
//! Sorting runs a quicksort over `(value, original index)` pairs. Pairs are
//! compared numerically and then by index, which makes every key distinct:
//! the sorted order is therefore unique and stable whatever pivot is chosen,
//! and the permutation falls out of the same pass. `-0.0` and `0.0` tie. NaN
//! values sort after every number regardless of their sign bit.

use std::cmp::Ordering;

use crate::error::{KernelError, Result};
use crate::kernel::Kernel;
use crate::math::Array1;
use crate::shape::{assemble_lanes, ensure_non_empty, map_lanes, Array, Axis, Lane, Reduction};

/// Ranges at or below this length are finished with insertion sort.
const INSERTION_THRESHOLD: usize = 12;

type Keyed = (f64, usize);

/// Numeric order with every NaN ranked above every number.
#[inline]
fn cmp_value(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if a < b => Ordering::Less,
        (false, false) if a > b => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[inline]
fn cmp_keyed(a: &Keyed, b: &Keyed) -> Ordering {
    cmp_value(a.0, b.0).then(a.1.cmp(&b.1))
}

/// Sort `values` ascending and return the sorted values together with the
/// original index of each of them.
pub(crate) fn sort_lane(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut keyed: Vec<Keyed> = values.iter().copied().zip(0..).collect();
    quicksort(&mut keyed);
    keyed.into_iter().unzip()
}

fn quicksort(mut v: &mut [Keyed]) {
    // Recurse into the smaller side, loop on the larger: stack depth stays logarithmic.
    loop {
        if v.len() <= INSERTION_THRESHOLD {
            insertion_sort(v);
            return;
        }
        let pivot = partition(v);
        let (left, right) = std::mem::take(&mut v).split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quicksort(left);
            v = right;
        } else {
            quicksort(right);
            v = left;
        }
    }
}

/// Lomuto partition around the median of first, middle and last element.
/// Returns the final position of the pivot.
fn partition(v: &mut [Keyed]) -> usize {
    let last = v.len() - 1;
    let mid = last / 2;
    if cmp_keyed(&v[mid], &v[0]) == Ordering::Less {
        v.swap(mid, 0);
    }
    if cmp_keyed(&v[last], &v[0]) == Ordering::Less {
        v.swap(last, 0);
    }
    if cmp_keyed(&v[mid], &v[last]) == Ordering::Less {
        v.swap(mid, last);
    }

    let mut store = 0;
    for i in 0..last {
        if cmp_keyed(&v[i], &v[last]) == Ordering::Less {
            v.swap(i, store);
            store += 1;
        }
    }
    v.swap(store, last);
    store
}

fn insertion_sort(v: &mut [Keyed]) {
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && cmp_keyed(&v[j], &v[j - 1]) == Ordering::Less {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Position of the first element that `better` prefers over all earlier ones.
fn first_extreme(values: &[f64], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if better(value, values[best]) {
            best = idx;
        }
    }
    best
}

fn first_min(values: &[f64]) -> usize {
    first_extreme(values, |candidate, current| candidate < current)
}

fn first_max(values: &[f64]) -> usize {
    first_extreme(values, |candidate, current| candidate > current)
}

fn flat_unsupported(operation: &'static str) -> KernelError {
    KernelError::Unsupported {
        operation,
        reason: "ordering a matrix requires axis 0 or 1",
    }
}

impl Kernel {
    /// Sorted values and permutation in one pass; `sort` and `argsort` are
    /// views over this.
    pub fn sort_with_permutation(
        &self,
        array: &Array,
        axis: Axis,
    ) -> Result<(Array, Array<usize>)> {
        const OP: &str = "sort";

        ensure_non_empty(OP, array)?;
        match array {
            Array::Vector(v) => {
                let (sorted, permutation) = sort_lane(v.as_slice());
                Ok((
                    Array::Vector(Array1::from_vec(sorted)),
                    Array::Vector(Array1::from_vec(permutation)),
                ))
            }
            Array::Matrix(m) => {
                let lane = axis.lane().ok_or_else(|| flat_unsupported(OP))?;
                log::debug!("sorting {}x{} matrix along axis {}", m.nrows(), m.ncols(), axis);
                let lanes = map_lanes(m, lane, self.parallel_for(m.len()), sort_lane);
                let (sorted, permutations): (Vec<_>, Vec<_>) = lanes.into_iter().unzip();
                Ok((
                    Array::Matrix(assemble_lanes(sorted, lane, m.shape())?),
                    Array::Matrix(assemble_lanes(permutations, lane, m.shape())?),
                ))
            }
        }
    }

    /// Ascending copy of `array`; a matrix is sorted per column (axis 0) or
    /// per row (axis 1).
    pub fn sort(&self, array: &Array, axis: Axis) -> Result<Array> {
        self.sort_with_permutation(array, axis).map(|(sorted, _)| sorted)
    }

    /// Index order that [`Kernel::sort`] applies. For a matrix every column
    /// (axis 0) or row (axis 1) of the result is a permutation of that lane.
    pub fn argsort(&self, array: &Array, axis: Axis) -> Result<Array<usize>> {
        self.sort_with_permutation(array, axis)
            .map(|(_, permutation)| permutation)
    }

    /// Index of the first minimum, per column (axis 0) or row (axis 1) for a matrix.
    pub fn argmin(&self, array: &Array, axis: Axis) -> Result<Reduction<usize>> {
        self.arg_extreme("argmin", array, axis, first_min)
    }

    /// Index of the first maximum, per column (axis 0) or row (axis 1) for a matrix.
    pub fn argmax(&self, array: &Array, axis: Axis) -> Result<Reduction<usize>> {
        self.arg_extreme("argmax", array, axis, first_max)
    }

    fn arg_extreme(
        &self,
        operation: &'static str,
        array: &Array,
        axis: Axis,
        scan: fn(&[f64]) -> usize,
    ) -> Result<Reduction<usize>> {
        ensure_non_empty(operation, array)?;
        match array {
            Array::Vector(v) => Ok(Reduction::Scalar(scan(v.as_slice()))),
            Array::Matrix(m) => {
                let lane: Lane = axis.lane().ok_or_else(|| flat_unsupported(operation))?;
                let indices = map_lanes(m, lane, self.parallel_for(m.len()), scan);
                Ok(Reduction::Vector(Array1::from_vec(indices)))
            }
        }
    }
}
