//! Rayon worker-pool sizing for batch tier resolution.

use rayon::ThreadPoolBuilder;

/// Number of worker threads used for whole-dataset work. 0 means the global
/// rayon pool (one thread per core).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Run `f` on a pool of this size. When the dedicated pool cannot be
    /// built, `f` runs on the global pool instead.
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
                log::warn!(
                    "could not build a {}-thread pool ({err}); using the global pool",
                    self.workers
                );
                f()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pool_runs_on_requested_thread_count() {
        let threads = WorkerPool::with_workers(3).install(rayon::current_num_threads);
        assert_eq!(threads, 3);
    }

    #[test]
    fn zero_workers_uses_global_pool() {
        let threads = WorkerPool::default().install(rayon::current_num_threads);
        assert_eq!(threads, rayon::current_num_threads());
    }
}
