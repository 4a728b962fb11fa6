//! Real-world graph edge-list generator.
//!
//! Input files are whitespace-separated `key value` lines of unsigned
//! 64-bit integers (space-filling-curve codes in the reference datasets).
//! The whole file is parsed in parallel on first access and cached for the
//! process lifetime; every run afterwards copies from the cache.

use std::path::Path;

use log::warn;
use rayon::prelude::*;

use crate::dataset::{read_text, CacheSlot};
use crate::datatype::Datatype;
use crate::error::DatasetError;
use crate::parallel::Pool;

use super::{copy_clamped, Generator};

struct GraphParams {
    path: &'static str,
    dataset: &'static str,
    /// Declared element count; `None` means the parsed count is
    /// authoritative, `Some` is validated against it.
    declared: Option<u64>,
}

const PARAMS: [GraphParams; 2] = [
    GraphParams {
        path: "data/hilbert_code.in",
        dataset: "hilbert",
        declared: None,
    },
    GraphParams {
        path: "data/morton_code.in",
        dataset: "morton",
        declared: None,
    },
];

static CACHE: [CacheSlot<Vec<(u64, u64)>>; PARAMS.len()] =
    [const { CacheSlot::new() }; PARAMS.len()];

fn parse_line(line: &str) -> Option<(u64, u64)> {
    let mut fields = line.split_whitespace();
    let key = fields.next()?.parse().ok()?;
    let value = fields.next()?.parse().ok()?;
    Some((key, value))
}

/// Parse an edge list. Malformed lines are warned about and skipped;
/// blank lines are ignored silently.
fn parse_edge_list(path: &str, text: &str) -> Vec<(u64, u64)> {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .par_iter()
        .enumerate()
        .filter_map(|(lineno, &line)| {
            if line.trim().is_empty() {
                return None;
            }
            let pair = parse_line(line);
            if pair.is_none() {
                warn!("{path}: cannot parse line {}: {line:?}", lineno + 1);
            }
            pair
        })
        .collect()
}

fn load(index: usize) -> Result<Vec<(u64, u64)>, DatasetError> {
    let params = &PARAMS[index];
    let text = read_text(Path::new(params.path))?;
    let edges = parse_edge_list(params.path, &text);
    if let Some(declared) = params.declared {
        if declared != edges.len() as u64 {
            return Err(DatasetError::SizeMismatch {
                path: params.path.to_string(),
                declared,
                parsed: edges.len() as u64,
            });
        }
    }
    Ok(edges)
}

/// Real-world generator for graph edge lists. Pairs only; the dataset size
/// is dictated by the file, not the sweep.
pub struct GenGraph;

impl Generator for GenGraph {
    const NAME: &'static str = "graph";
    const SIZE_FROM_DATA: bool = true;

    fn num_params() -> usize {
        PARAMS.len()
    }

    fn param_name(index: usize) -> String {
        format!("graph_{}", PARAMS[index].dataset)
    }

    fn accepts<T: Datatype>() -> bool {
        // Edges carry a payload; key-only types would silently drop it.
        !T::SIMPLE_KEY
    }

    fn fill<T: Datatype>(dst: &mut [T], index: usize, pool: &Pool) -> Result<(), DatasetError> {
        let edges = CACHE[index].get_or_load(|| pool.run(|| load(index)))?;
        copy_clamped(Self::NAME, dst, &edges, |&(k, v)| T::from_pair(k, v));
        Ok(())
    }

    fn data_size(index: usize) -> Result<usize, DatasetError> {
        // First call triggers the load; later calls hit the cache.
        let edges = CACHE[index].get_or_load(|| load(index))?;
        Ok(edges.len())
    }
}
