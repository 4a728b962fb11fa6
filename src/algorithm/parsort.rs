//! Parallel comparison sort: rayon's parallel unstable pdqsort, bounded by
//! the harness thread pool.

use std::time::Instant;

use rayon::prelude::*;

use crate::datatype::Datatype;
use crate::parallel::Pool;

use super::{millis_since, SortAlgorithm, SortTiming};

pub struct ParSort;

impl SortAlgorithm for ParSort {
    const NAME: &'static str = "parsort";
    const PARALLEL: bool = true;

    fn accepts<T: Datatype>() -> bool {
        true
    }

    fn sort<T: Datatype>(data: &mut [T], pool: &Pool) -> SortTiming {
        let start = Instant::now();
        pool.run(|| data.par_sort_unstable_by(T::compare));
        SortTiming {
            preproc_ms: 0.0,
            sort_ms: millis_since(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn agrees_with_sequential_sort() {
        let pool = Pool::new(4).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut data: Vec<u64> = (0..50_000).map(|_| rng.random()).collect();
        let mut expected = data.clone();
        expected.sort_unstable();
        ParSort::sort(&mut data, &pool);
        assert_eq!(data, expected);
    }

    #[test]
    fn sorts_doubles_with_total_order() {
        let pool = Pool::new(2).unwrap();
        let mut data = vec![2.5f64, -1.0, 0.0, -7.25, 3.0];
        ParSort::sort(&mut data, &pool);
        assert_eq!(data, vec![-7.25, -1.0, 0.0, 2.5, 3.0]);
    }
}
