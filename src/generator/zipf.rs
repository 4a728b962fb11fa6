//! Zipf-distributed key generator.
//!
//! Keys follow a Zipf law with skew `s` over a population of `N` ranks:
//! weight(k) = k^-s. Sampling goes through a Walker/Vose alias table, so a
//! draw is O(1) regardless of N and the heavy tail is exact, not
//! approximated. The table is rebuilt on every call because the parameter
//! index can change N and s between runs; it is never cached.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::datatype::{mix64, Datatype};
use crate::error::DatasetError;
use crate::parallel::Pool;

use super::Generator;

/// Walker/Vose alias table over a weight vector. One uniform double in
/// [0, 1) per sample.
pub struct AliasTable {
    prob: Vec<f64>,
    alias: Vec<u32>,
}

impl AliasTable {
    pub fn new(weights: &[f64]) -> Self {
        let n = weights.len();
        assert!(n > 0 && n <= u32::MAX as usize);

        let total: f64 = weights.iter().sum();
        let scale = n as f64 / total;
        let mut scaled: Vec<f64> = weights.iter().map(|w| w * scale).collect();

        let mut prob = vec![0.0f64; n];
        let mut alias = vec![0u32; n];
        let mut small: Vec<u32> = Vec::new();
        let mut large: Vec<u32> = Vec::new();
        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i as u32);
            } else {
                large.push(i as u32);
            }
        }

        while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
            small.pop();
            prob[s as usize] = scaled[s as usize];
            alias[s as usize] = l;
            scaled[l as usize] -= 1.0 - scaled[s as usize];
            if scaled[l as usize] < 1.0 {
                large.pop();
                small.push(l);
            }
        }
        // Leftovers on either worklist are exactly-1 columns up to rounding.
        for &i in small.iter().chain(large.iter()) {
            prob[i as usize] = 1.0;
        }

        AliasTable { prob, alias }
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// Map one uniform sample in [0, 1) to a rank in [0, len).
    #[inline]
    pub fn sample(&self, u: f64) -> u32 {
        let n = self.prob.len();
        let x = u * n as f64;
        let i = (x as usize).min(n - 1);
        let frac = x - i as f64;
        if frac < self.prob[i] {
            i as u32
        } else {
            self.alias[i]
        }
    }
}

/// Zipf weight vector: rank k (1-based) gets weight k^-s.
pub fn zipf_weights(n: usize, s: f64) -> Vec<f64> {
    (1..=n).map(|k| (k as f64).powf(-s)).collect()
}

#[derive(Clone, Copy)]
struct ZipfParams {
    s: f64,
    n: usize,
}

const PARAMS: [ZipfParams; 3] = [
    ZipfParams { s: 0.5, n: 1_000_000 },
    ZipfParams { s: 0.75, n: 1_500_000 },
    ZipfParams { s: 0.9, n: 2_000_000 },
];

/// Synthetic parametric Zipf generator. Each parameter index is a
/// (skew, population) pair; the alias table is built once per call and
/// sampled in parallel across independently seeded partitions.
pub struct GenZipf;

impl Generator for GenZipf {
    const NAME: &'static str = "zipf";

    fn num_params() -> usize {
        PARAMS.len()
    }

    fn param_name(index: usize) -> String {
        let p = PARAMS[index];
        format!("zipf_s={}_N={}", p.s, p.n)
    }

    fn accepts<T: Datatype>() -> bool {
        true
    }

    fn fill<T: Datatype>(dst: &mut [T], index: usize, pool: &Pool) -> Result<(), DatasetError> {
        let params = PARAMS[index];
        let table = AliasTable::new(&zipf_weights(params.n, params.s));

        let seed: u64 = rand::rng().random();
        let table = &table;
        pool.for_each_partition(dst, move |part, chunk| {
            let mut rng = SmallRng::seed_from_u64(seed ^ mix64(part as u64));
            for slot in chunk {
                *slot = T::from_key(table.sample(rng.random::<f64>()) as u64);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_table_degenerate_weight_always_wins() {
        let table = AliasTable::new(&[1.0, 0.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert_eq!(table.sample(rng.random::<f64>()), 0);
        }
    }

    #[test]
    fn alias_table_uniform_weights_hit_every_rank() {
        let table = AliasTable::new(&[1.0; 8]);
        let mut seen = [false; 8];
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..10_000 {
            seen[table.sample(rng.random::<f64>()) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn skewed_table_prefers_low_ranks() {
        let table = AliasTable::new(&zipf_weights(1000, 1.0));
        let mut rng = SmallRng::seed_from_u64(3);
        let samples = 100_000;
        let rank0 = (0..samples)
            .filter(|_| table.sample(rng.random::<f64>()) == 0)
            .count();
        // Rank 0 holds weight 1 of H(1000) ~ 7.49, so ~13% of the mass.
        assert!(rank0 > samples / 20, "rank 0 drawn only {rank0} times");
    }

    #[test]
    fn zipf_fill_stays_inside_population() {
        let pool = Pool::new(4).unwrap();
        let mut data = vec![0u64; 10_000];
        GenZipf::fill(&mut data, 0, &pool).unwrap();
        assert!(data.iter().all(|&k| k < 1_000_000));
    }

    #[test]
    fn param_names_are_distinct_and_stable() {
        assert_eq!(GenZipf::num_params(), 3);
        assert_eq!(GenZipf::param_name(0), "zipf_s=0.5_N=1000000");
        assert_eq!(GenZipf::param_name(2), "zipf_s=0.9_N=2000000");
    }
}
