//! The `Kernel` facade.
//!
//! A `Kernel` is an immutable bundle of configuration. The ordering,
//! reduction and linear-algebra engines are implemented as `impl Kernel`
//! blocks in their own modules, so every public operation is a method here
//! and the crate-root free functions simply use `Kernel::default()`.

use crate::config::KernelConfig;

#[derive(Debug, Clone, Default)]
pub struct Kernel {
    config: KernelConfig,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Whether lane-wise work over `elements` values should use the rayon pool.
    pub(crate) fn parallel_for(&self, elements: usize) -> bool {
        let parallel = elements >= self.config.parallel_threshold;
        log::trace!(
            "{} elements against threshold {}: {}",
            elements,
            self.config.parallel_threshold,
            if parallel { "parallel" } else { "sequential" }
        );
        parallel
    }
}
