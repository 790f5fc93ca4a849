use std::error::Error;
use std::fmt;

use crate::math::ShapeError;

/// Errors raised by the ordering, reduction and linear-algebra routines.
///
/// Every variant carries the name of the operation that failed so callers
/// can tell which constraint was violated.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Input is not a sequence, or its elements are neither uniformly numeric
    /// nor uniformly numeric sequences (mixed, ragged or non-numeric input).
    Type {
        operation: &'static str,
        reason: String,
    },
    /// Input sequence is empty.
    Empty { operation: &'static str },
    /// Operand shapes are incompatible.
    ShapeMismatch {
        operation: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// Requested combination of input and axis is deliberately not implemented.
    Unsupported {
        operation: &'static str,
        reason: &'static str,
    },
    /// A divisor would be zero or negative (e.g. `ddof >= n`).
    Domain {
        operation: &'static str,
        reason: String,
    },
    Singular { operation: &'static str },
    NoConvergence {
        operation: &'static str,
        iterations: usize,
    },
    Shape(ShapeError),
}

impl KernelError {
    pub(crate) fn type_error(operation: &'static str, reason: impl Into<String>) -> Self {
        KernelError::Type {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn domain(operation: &'static str, reason: impl Into<String>) -> Self {
        KernelError::Domain {
            operation,
            reason: reason.into(),
        }
    }

    /// Name of the operation that raised the error, if known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            KernelError::Type { operation, .. }
            | KernelError::Empty { operation }
            | KernelError::ShapeMismatch { operation, .. }
            | KernelError::Unsupported { operation, .. }
            | KernelError::Domain { operation, .. }
            | KernelError::Singular { operation }
            | KernelError::NoConvergence { operation, .. } => Some(operation),
            KernelError::Shape(_) => None,
        }
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KernelError::Type { operation, reason } => {
                write!(f, "{}: type error: {}", operation, reason)
            }
            KernelError::Empty { operation } => write!(f, "{}: empty input", operation),
            KernelError::ShapeMismatch {
                operation,
                expected,
                got,
            } => write!(
                f,
                "{}: shape mismatch, expected {:?} but got {:?}",
                operation, expected, got
            ),
            KernelError::Unsupported { operation, reason } => {
                write!(f, "{}: unsupported operation: {}", operation, reason)
            }
            KernelError::Domain { operation, reason } => {
                write!(f, "{}: domain error: {}", operation, reason)
            }
            KernelError::Singular { operation } => write!(f, "{}: singular matrix", operation),
            KernelError::NoConvergence {
                operation,
                iterations,
            } => write!(
                f,
                "{}: did not converge after {} iterations",
                operation, iterations
            ),
            KernelError::Shape(err) => write!(f, "{}", err),
        }
    }
}

impl Error for KernelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            KernelError::Shape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShapeError> for KernelError {
    fn from(err: ShapeError) -> Self {
        KernelError::Shape(err)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KernelError>;
