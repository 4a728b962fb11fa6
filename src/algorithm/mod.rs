//! Sorting algorithms under test.
//!
//! Algorithms are pluggable: each one implements [`SortAlgorithm`] and is
//! listed in the registry. The bundled implementations are thin reference
//! adapters that exercise the contract; the harness neither implements
//! sorting research nor judges a winner.

pub mod donothing;
pub mod parsort;
pub mod quicksort;
pub mod radix;

use std::time::Instant;

use crate::datatype::Datatype;
use crate::parallel::Pool;

pub use donothing::DoNothing;
pub use parsort::ParSort;
pub use quicksort::QuickSort;
pub use radix::RadixSort;

/// Timing pair reported by an algorithm, in milliseconds. The algorithm
/// measures itself so the numbers cover exactly the work it deems relevant
/// (setup it wants excluded from the sort figure goes into `preproc_ms`).
#[derive(Clone, Copy, Debug, Default)]
pub struct SortTiming {
    pub preproc_ms: f64,
    pub sort_ms: f64,
}

pub(crate) fn millis_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1e3
}

/// Capability contract every algorithm implements.
pub trait SortAlgorithm {
    /// Name matched against CLI filters.
    const NAME: &'static str;

    /// Whether the algorithm uses the worker pool. Sequential algorithms
    /// always get a copy-back before timing; parallel ones only on request.
    const PARALLEL: bool;

    /// Capability predicate over the datatype's key traits. Checked at
    /// combination-selection time, before any data is materialized.
    fn accepts<T: Datatype>() -> bool;

    /// Sort `data` in place and report self-measured timings.
    fn sort<T: Datatype>(data: &mut [T], pool: &Pool) -> SortTiming;
}
