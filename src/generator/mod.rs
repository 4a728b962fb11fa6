//! Dataset generators: synthetic (regenerated per run) and real-world
//! (file-backed, loaded once per process and cached).

pub mod graph;
pub mod rna;
pub mod sdss;
pub mod uniform;
pub mod zipf;

use log::warn;

use crate::datatype::Datatype;
use crate::error::DatasetError;
use crate::parallel::Pool;

pub use graph::GenGraph;
pub use rna::GenRna;
pub use sdss::GenSdss;
pub use uniform::GenUniform;
pub use zipf::GenZipf;

/// Capability contract every generator implements.
///
/// A generator fills a caller-provided contiguous destination with typed
/// values. Parametric generators own a fixed parameter table and are run
/// once per parameter index by the dispatch chain.
pub trait Generator {
    /// Family name matched against CLI filters.
    const NAME: &'static str;

    /// True for real-world generators whose element count is dictated by
    /// file content instead of the size sweep.
    const SIZE_FROM_DATA: bool = false;

    /// Number of dataset variants this generator can produce.
    fn num_params() -> usize {
        1
    }

    /// Identifying string for one variant, used in the result stream.
    fn param_name(_index: usize) -> String {
        Self::NAME.to_string()
    }

    /// Capability predicate: can this generator emit type `T`?
    fn accepts<T: Datatype>() -> bool;

    /// Fill `dst` for the given parameter index. Real-world generators
    /// clamp to the available element count (warning once, zero-filling
    /// the rest); synthetic generators always fill completely.
    fn fill<T: Datatype>(dst: &mut [T], index: usize, pool: &Pool) -> Result<(), DatasetError>;

    /// Authoritative element count for `SIZE_FROM_DATA` generators. May
    /// trigger the lazy load.
    fn data_size(index: usize) -> Result<usize, DatasetError> {
        let _ = index;
        Ok(0)
    }
}

/// Copy a cached dataset into the destination, clamping to what is
/// available. Slots past the available count stay at their zero default.
pub(crate) fn copy_clamped<T, S>(
    generator: &str,
    dst: &mut [T],
    src: &[S],
    map: impl Fn(&S) -> T,
) where
    T: Datatype,
{
    if dst.len() > src.len() {
        warn!(
            "{generator}: requested {} elements but only {} are available; \
             zero-filling the remainder",
            dst.len(),
            src.len()
        );
    }
    let n = dst.len().min(src.len());
    for (slot, item) in dst[..n].iter_mut().zip(src) {
        *slot = map(item);
    }
    for slot in &mut dst[n..] {
        *slot = T::default();
    }
}
