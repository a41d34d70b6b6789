//! Rayon thread pool configuration for processing independent loot tables.
//!
//! Use [WorkerPool::map] to run one job per input with a fixed number of
//! threads, or rely on Rayon's default (all CPU cores).

use log::warn;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Configures how many worker threads are used for per-file jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus); 1 runs inline.
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure on a thread pool with this worker count. If [workers](WorkerPool::workers) is 0,
    /// uses the global Rayon pool. Otherwise builds a temporary pool with that many threads,
    /// falling back to the global pool if it cannot be built.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                warn!("could not build {}-thread pool ({err}); using the global pool", self.workers);
                f()
            }
        }
    }

    /// Apply `job` to every input; results keep input order regardless of scheduling.
    pub fn map<T, R, F>(&self, inputs: &[T], job: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if self.workers == 1 || inputs.len() <= 1 {
            return inputs.iter().map(job).collect();
        }
        self.install(|| inputs.par_iter().map(job).collect())
    }
}
