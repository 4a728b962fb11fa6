//! Sequential comparison sort: the standard library's unstable pdqsort.

use std::time::Instant;

use crate::datatype::Datatype;
use crate::parallel::Pool;

use super::{millis_since, SortAlgorithm, SortTiming};

pub struct QuickSort;

impl SortAlgorithm for QuickSort {
    const NAME: &'static str = "quicksort";
    const PARALLEL: bool = false;

    fn accepts<T: Datatype>() -> bool {
        true
    }

    fn sort<T: Datatype>(data: &mut [T], _pool: &Pool) -> SortTiming {
        let start = Instant::now();
        data.sort_unstable_by(T::compare);
        SortTiming {
            preproc_ms: 0.0,
            sort_ms: millis_since(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::KeyValuePair;

    #[test]
    fn sorts_pairs_by_key() {
        let pool = Pool::new(1).unwrap();
        let mut data = vec![
            KeyValuePair { key: 3, value: 1 },
            KeyValuePair { key: 1, value: 2 },
            KeyValuePair { key: 2, value: 3 },
        ];
        QuickSort::sort(&mut data, &pool);
        let keys: Vec<u64> = data.iter().map(|p| p.key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[test]
    fn sorted_input_is_a_fixed_point() {
        let pool = Pool::new(1).unwrap();
        let mut data: Vec<u64> = (0..1_000).collect();
        let expected = data.clone();
        QuickSort::sort(&mut data, &pool);
        assert_eq!(data, expected);
    }

    #[test]
    fn empty_and_single_inputs_are_fine() {
        let pool = Pool::new(1).unwrap();
        let mut empty: Vec<u64> = vec![];
        QuickSort::sort(&mut empty, &pool);
        let mut one = vec![42u64];
        QuickSort::sort(&mut one, &pool);
        assert_eq!(one, vec![42]);
    }
}
