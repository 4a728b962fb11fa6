//! Real-world RNA sequence generator.
//!
//! The dataset is a binary sequence-of-strings cache produced from FASTA
//! input (see `dataset::fasta_to_string_cache`). Variable-length strings do
//! not fit the fixed-size datatype family, so each sequence is surfaced as
//! the big-endian `u64` of its first 8 bytes: a fixed-width prefix key that
//! preserves lexicographic order of the prefixes.

use std::path::Path;

use crate::dataset::{read_string_cache, CacheSlot};
use crate::datatype::Datatype;
use crate::error::DatasetError;
use crate::parallel::Pool;

use super::{copy_clamped, Generator};

const PARAMS: [(&str, &str); 1] = [("data/rna_ena.bin", "ena_sequences")];

static CACHE: [CacheSlot<Vec<u64>>; PARAMS.len()] = [const { CacheSlot::new() }; PARAMS.len()];

/// Big-endian prefix key: shorter sequences are zero-padded on the right,
/// which sorts them before longer sequences sharing the prefix.
fn prefix_key(seq: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    let n = seq.len().min(8);
    raw[..n].copy_from_slice(&seq[..n]);
    u64::from_be_bytes(raw)
}

fn load(index: usize) -> Result<Vec<u64>, DatasetError> {
    let sequences = read_string_cache(Path::new(PARAMS[index].0))?;
    Ok(sequences.iter().map(|s| prefix_key(s)).collect())
}

/// Real-world generator over cached RNA sequences, as u64 prefix keys.
pub struct GenRna;

impl Generator for GenRna {
    const NAME: &'static str = "rna";
    const SIZE_FROM_DATA: bool = true;

    fn num_params() -> usize {
        PARAMS.len()
    }

    fn param_name(index: usize) -> String {
        format!("rna_{}", PARAMS[index].1)
    }

    fn accepts<T: Datatype>() -> bool {
        // Prefix keys need the full 64 bits.
        T::NAME == u64::NAME
    }

    fn fill<T: Datatype>(dst: &mut [T], index: usize, _pool: &Pool) -> Result<(), DatasetError> {
        let keys = CACHE[index].get_or_load(|| load(index))?;
        copy_clamped(Self::NAME, dst, &keys, |&k| T::from_key(k));
        Ok(())
    }

    fn data_size(index: usize) -> Result<usize, DatasetError> {
        let keys = CACHE[index].get_or_load(|| load(index))?;
        Ok(keys.len())
    }
}
