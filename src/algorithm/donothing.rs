//! Baseline that sorts nothing.
//!
//! Useful for measuring harness overhead: generation, copy-back, checker,
//! and profiler signaling all run, the timed region is empty. Its runs are
//! expected to fail the sortedness check on unsorted inputs.

use crate::datatype::Datatype;
use crate::parallel::Pool;

use super::{SortAlgorithm, SortTiming};

pub struct DoNothing;

impl SortAlgorithm for DoNothing {
    const NAME: &'static str = "donothing";
    const PARALLEL: bool = false;

    fn accepts<T: Datatype>() -> bool {
        true
    }

    fn sort<T: Datatype>(_data: &mut [T], _pool: &Pool) -> SortTiming {
        SortTiming::default()
    }
}
