//! Rayon-based parallelisation utilities.
//!
//! Per-asset statistics and per-scenario stress evaluations share no
//! mutable state, so they are mapped over with Rayon when the workload is
//! large enough. Results always come back in input order and are identical
//! to the sequential path.

use rayon::prelude::*;

/// Minimum item count before parallel execution is used.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 8;

/// Parallel map preserving input order.
pub fn parallel_map<T, R, F>(items: &[T], mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(mapper).collect()
}

/// Parallel map over fallible work.
///
/// Returns the first error in input order if any item fails.
pub fn try_parallel_map<T, R, E, F>(items: &[T], mapper: F) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync + Send,
{
    parallel_map(items, mapper).into_iter().collect()
}

/// Configuration for parallel execution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelConfig {
    /// Minimum items before using parallelism
    pub parallel_threshold: usize,
    /// Disable parallelism entirely
    pub sequential: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            sequential: false,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(parallel_threshold: usize) -> Self {
        Self {
            parallel_threshold,
            sequential: false,
        }
    }

    /// Configuration that never spawns parallel work.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            sequential: true,
        }
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        !self.sequential && n_items >= self.parallel_threshold
    }

    /// Map fallible work, in parallel when the item count warrants it.
    pub fn try_map<T, R, E, F>(&self, items: &[T], mapper: F) -> Result<Vec<R>, E>
    where
        T: Sync,
        R: Send,
        E: Send,
        F: Fn(&T) -> Result<R, E> + Sync + Send,
    {
        if self.should_parallelize(items.len()) {
            try_parallel_map(items, mapper)
        } else {
            items.iter().map(mapper).collect()
        }
    }
}
