//! Sequential LSB radix sort over unsigned keys, 8-bit digits.
//!
//! Only datatypes with the unsigned-key trait are accepted; the capability
//! predicate keeps everything else (e.g. doubles) out at selection time.
//! The auxiliary buffer allocation is reported as preprocessing time.

use std::time::Instant;

use crate::datatype::Datatype;
use crate::parallel::Pool;

use super::{millis_since, SortAlgorithm, SortTiming};

const RADIX_BITS: u32 = 8;
const BUCKETS: usize = 1 << RADIX_BITS;
const PASSES: u32 = 64 / RADIX_BITS;

pub struct RadixSort;

impl SortAlgorithm for RadixSort {
    const NAME: &'static str = "radix";
    const PARALLEL: bool = false;

    fn accepts<T: Datatype>() -> bool {
        T::HAS_UNSIGNED_KEY
    }

    fn sort<T: Datatype>(data: &mut [T], _pool: &Pool) -> SortTiming {
        let n = data.len();
        if n <= 1 {
            return SortTiming::default();
        }

        let pre = Instant::now();
        let mut aux: Vec<T> = vec![T::default(); n];
        let preproc_ms = millis_since(pre);

        let start = Instant::now();
        let mut flipped = false;
        for pass in 0..PASSES {
            let shift = pass * RADIX_BITS;
            let (src, dst) = if flipped {
                (aux.as_mut_slice(), &mut *data)
            } else {
                (&mut *data, aux.as_mut_slice())
            };

            let mut counts = [0usize; BUCKETS];
            for x in src.iter() {
                counts[((x.unsigned_key() >> shift) & 0xff) as usize] += 1;
            }
            // A pass where every key shares the digit moves nothing.
            if counts.iter().any(|&c| c == n) {
                continue;
            }

            let mut offsets = [0usize; BUCKETS];
            let mut sum = 0;
            for (offset, &count) in offsets.iter_mut().zip(&counts) {
                *offset = sum;
                sum += count;
            }

            for &x in src.iter() {
                let digit = ((x.unsigned_key() >> shift) & 0xff) as usize;
                dst[offsets[digit]] = x;
                offsets[digit] += 1;
            }
            flipped = !flipped;
        }

        if flipped {
            data.copy_from_slice(&aux);
        }
        SortTiming {
            preproc_ms,
            sort_ms: millis_since(start),
        }
    }
}
