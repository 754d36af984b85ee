//! Parallel execution helpers for whole-dataset work.

pub mod pool;

pub use pool::WorkerPool;
