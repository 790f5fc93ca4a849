use serde::{Deserialize, Serialize};

/// Tuning knobs for a [`crate::Kernel`].
///
/// None of these change results: the parallel threshold only decides whether
/// per-row/per-column work is spread over the rayon pool, and the eigen
/// settings are the defaults used by [`crate::Kernel::eigen_solve_default`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KernelConfig {
    /// Minimum number of matrix elements before lanes are processed in parallel.
    pub parallel_threshold: usize,
    pub eigen_tolerance: f64,
    pub eigen_max_iterations: usize,
}

impl KernelConfig {
    pub fn new(parallel_threshold: usize) -> Self {
        Self {
            parallel_threshold,
            ..Self::default()
        }
    }

    /// Configuration that never leaves the calling thread.
    pub fn sequential() -> Self {
        Self::new(usize::MAX)
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 16_384,
            eigen_tolerance: 1e-10,
            eigen_max_iterations: 100,
        }
    }
}
