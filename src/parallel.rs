//! Thread-pool plumbing shared by generators, algorithms, and the checker.
//!
//! One rayon pool is built per process from the configured thread count.
//! Everything parallel in the harness runs inside it, so `--threads` bounds
//! the whole experiment, not just the algorithm under test.

use rayon::ThreadPoolBuilder;

use crate::error::BenchError;

/// Process-wide worker pool.
pub struct Pool {
    inner: rayon::ThreadPool,
    threads: usize,
}

impl Pool {
    pub fn new(threads: usize) -> Result<Self, BenchError> {
        let threads = threads.max(1);
        let inner = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sortbench-worker-{i}"))
            .build()
            .map_err(|e| BenchError::ThreadPool(e.to_string()))?;
        Ok(Pool { inner, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run a closure inside the pool so rayon parallel iterators used by it
    /// are bounded by the configured thread count.
    pub fn run<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        self.inner.install(f)
    }

    /// Split `data` into at most `threads` contiguous partitions and run
    /// `f(partition_index, partition)` for each, in parallel.
    ///
    /// The partition index is stable for a given length and thread count;
    /// generators mix it into their seed so workers draw from independent
    /// random streams instead of correlated ones.
    pub fn for_each_partition<T, F>(&self, data: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        let len = data.len();
        if len == 0 {
            return;
        }
        let parts = self.threads.min(len);
        let chunk = len.div_ceil(parts);
        self.inner.scope(|scope| {
            for (index, part) in data.chunks_mut(chunk).enumerate() {
                let f = &f;
                scope.spawn(move |_| f(index, part));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn partitions_cover_every_slot_once() {
        let pool = Pool::new(4).unwrap();
        let mut data = vec![0u32; 1000];
        pool.for_each_partition(&mut data, |_, part| {
            for slot in part {
                *slot += 1;
            }
        });
        assert!(data.iter().all(|&v| v == 1));
    }

    #[test]
    fn partition_count_never_exceeds_threads() {
        let pool = Pool::new(3).unwrap();
        let seen = AtomicUsize::new(0);
        let mut data = vec![0u8; 100];
        pool.for_each_partition(&mut data, |_, _| {
            seen.fetch_add(1, Ordering::Relaxed);
        });
        assert!(seen.load(Ordering::Relaxed) <= 3);
    }

    #[test]
    fn empty_input_is_a_noop() {
        let pool = Pool::new(2).unwrap();
        let mut data: Vec<u64> = Vec::new();
        pool.for_each_partition(&mut data, |_, _| panic!("no partitions expected"));
    }
}
