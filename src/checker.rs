//! Parallel correctness checker.
//!
//! Two properties per run, both checked with parallel scans so the checker
//! never becomes the bottleneck of large experiments:
//!
//! - sortedness: every adjacent pair ordered under the datatype comparator,
//!   AND-reduced. Exact.
//! - permutation preservation: an order-independent wrapping sum of element
//!   fingerprints, captured before and after sorting. Equal sums are strong
//!   evidence, not proof (collisions are possible in principle), hence the
//!   "likely" naming.
//!
//! Compiled out entirely when the `checker` feature is off.

use rayon::prelude::*;

use crate::datatype::Datatype;
use crate::parallel::Pool;

/// Pre/post fingerprint state for one run.
#[derive(Debug, Default)]
pub struct ParallelChecker {
    pre_sum: u64,
    pre_len: usize,
    post_sum: u64,
    post_len: usize,
    sorted: bool,
}

fn fingerprint_sum<T: Datatype>(data: &[T], pool: &Pool) -> u64 {
    pool.run(|| {
        data.par_iter()
            .map(T::fingerprint)
            .reduce(|| 0u64, u64::wrapping_add)
    })
}

impl ParallelChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the input fingerprint. Call after generation, before the
    /// timed sort.
    pub fn record_pre<T: Datatype>(&mut self, data: &[T], pool: &Pool) {
        self.pre_sum = fingerprint_sum(data, pool);
        self.pre_len = data.len();
    }

    /// Capture the output fingerprint and the sortedness verdict. Call
    /// after the timed sort.
    pub fn record_post<T: Datatype>(&mut self, data: &[T], pool: &Pool) {
        self.post_sum = fingerprint_sum(data, pool);
        self.post_len = data.len();
        self.sorted = pool.run(|| {
            data.par_windows(2)
                .all(|w| w[0].compare(&w[1]) != std::cmp::Ordering::Greater)
        });
    }

    /// Exact: non-decreasing under the datatype's total order. Trivially
    /// true for empty and single-element inputs.
    pub fn likely_sorted(&self) -> bool {
        self.sorted
    }

    /// Probabilistic: fingerprints matched, so the output is likely a
    /// permutation of the input.
    pub fn likely_permuted(&self) -> bool {
        self.pre_len == self.post_len && self.pre_sum == self.post_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::KeyValuePair;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn pool() -> Pool {
        Pool::new(4).unwrap()
    }

    #[test]
    fn accepts_sorted_permutation() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut data: Vec<u64> = (0..100_000).map(|_| rng.random()).collect();

        let mut checker = ParallelChecker::new();
        checker.record_pre(&data, &pool);
        data.sort_unstable();
        checker.record_post(&data, &pool);

        assert!(checker.likely_sorted());
        assert!(checker.likely_permuted());
    }

    #[test]
    fn detects_a_single_disordered_pair() {
        let pool = pool();
        let mut data: Vec<u64> = (0..10_000).collect();
        data.swap(7_000, 7_001);

        let mut checker = ParallelChecker::new();
        checker.record_pre(&data, &pool);
        checker.record_post(&data, &pool);

        assert!(!checker.likely_sorted());
        assert!(checker.likely_permuted()); // still the same multiset
    }

    #[test]
    fn detects_lost_and_corrupted_elements() {
        let pool = pool();
        let data: Vec<u64> = (0..1_000).collect();

        let mut checker = ParallelChecker::new();
        checker.record_pre(&data, &pool);
        let mut tampered = data.clone();
        tampered[500] = 99_999;
        checker.record_post(&tampered, &pool);
        assert!(!checker.likely_permuted());

        let mut checker = ParallelChecker::new();
        checker.record_pre(&data, &pool);
        checker.record_post(&data[..999], &pool);
        assert!(!checker.likely_permuted());
    }

    #[test]
    fn payload_corruption_fails_permutation_even_with_sorted_keys() {
        let pool = pool();
        let data: Vec<KeyValuePair> = (0..100)
            .map(|k| KeyValuePair { key: k, value: k * 3 })
            .collect();

        let mut checker = ParallelChecker::new();
        checker.record_pre(&data, &pool);
        let mut tampered = data.clone();
        tampered[50].value = 0;
        checker.record_post(&tampered, &pool);

        assert!(checker.likely_sorted());
        assert!(!checker.likely_permuted());
    }

    #[test]
    fn trivial_inputs_are_sorted() {
        let pool = pool();
        let empty: Vec<u64> = vec![];
        let mut checker = ParallelChecker::new();
        checker.record_pre(&empty, &pool);
        checker.record_post(&empty, &pool);
        assert!(checker.likely_sorted());
        assert!(checker.likely_permuted());

        let one = vec![5u64];
        let mut checker = ParallelChecker::new();
        checker.record_pre(&one, &pool);
        checker.record_post(&one, &pool);
        assert!(checker.likely_sorted());
        assert!(checker.likely_permuted());
    }

    #[test]
    fn ties_count_as_sorted() {
        let pool = pool();
        let data = vec![3u64; 64];
        let mut checker = ParallelChecker::new();
        checker.record_pre(&data, &pool);
        checker.record_post(&data, &pool);
        assert!(checker.likely_sorted());
    }
}
