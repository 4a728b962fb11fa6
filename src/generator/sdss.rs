//! Real-world SDSS sky-survey coordinate generator.
//!
//! Input is a CSV of `objID,ra,dec` rows with a header line. One load
//! parses both coordinate columns and caches them; the parameter index
//! picks the column to benchmark. The parsed columns are also persisted
//! as a columnar binary cache next to the CSV, so later processes skip
//! the text parse.

use std::path::Path;

use log::{debug, info, warn};

use crate::dataset::{read_columns, read_text, write_columns, CacheSlot};
use crate::datatype::Datatype;
use crate::error::DatasetError;
use crate::parallel::Pool;

use super::{copy_clamped, Generator};

const CSV_PATH: &str = "data/sdss_coordinates.csv";
const CACHE_PATH: &str = "data/sdss_coordinates.bin";

#[derive(Clone, Copy)]
enum Column {
    Ra,
    Dec,
}

const PARAMS: [(Column, &str); 2] = [(Column::Ra, "ra"), (Column::Dec, "dec")];

struct Coordinates {
    ra: Vec<f64>,
    dec: Vec<f64>,
}

// Both parameter indices read the same file, so they share one slot.
static CACHE: CacheSlot<Coordinates> = CacheSlot::new();

fn parse_csv(path: &str, text: &str) -> Coordinates {
    let mut ra = Vec::new();
    let mut dec = Vec::new();
    // First line is the header.
    for (lineno, line) in text.lines().enumerate().skip(1) {
        let mut fields = line.split(',');
        let parsed = (|| {
            let _obj_id = fields.next()?;
            let ra: f64 = fields.next()?.trim().parse().ok()?;
            let dec: f64 = fields.next()?.trim().parse().ok()?;
            Some((ra, dec))
        })();
        match parsed {
            Some((r, d)) => {
                ra.push(r);
                dec.push(d);
            }
            None => debug!("{path}: skipping unparsable line {}", lineno + 1),
        }
    }
    Coordinates { ra, dec }
}

fn load() -> Result<Coordinates, DatasetError> {
    if let Ok(columns) = read_columns(Path::new(CACHE_PATH)) {
        if let [ra, dec] = columns.as_slice() {
            info!("{CACHE_PATH}: loaded {} coordinate rows from cache", ra.len());
            return Ok(Coordinates {
                ra: ra.iter().map(|&v| f64::from_bits(v)).collect(),
                dec: dec.iter().map(|&v| f64::from_bits(v)).collect(),
            });
        }
        warn!("{CACHE_PATH}: unexpected column count, reparsing CSV");
    }

    let text = read_text(Path::new(CSV_PATH))?;
    let coords = parse_csv(CSV_PATH, &text);

    let columns = [
        coords.ra.iter().map(|v| v.to_bits()).collect(),
        coords.dec.iter().map(|v| v.to_bits()).collect(),
    ];
    if let Err(e) = write_columns(Path::new(CACHE_PATH), &columns) {
        warn!("{CACHE_PATH}: cannot write coordinate cache: {e}");
    }
    Ok(coords)
}

/// Real-world generator exposing one SDSS coordinate column as doubles.
pub struct GenSdss;

impl GenSdss {
    fn column(coords: &Coordinates, index: usize) -> &[f64] {
        match PARAMS[index].0 {
            Column::Ra => &coords.ra,
            Column::Dec => &coords.dec,
        }
    }
}

impl Generator for GenSdss {
    const NAME: &'static str = "sdss";
    const SIZE_FROM_DATA: bool = true;

    fn num_params() -> usize {
        PARAMS.len()
    }

    fn param_name(index: usize) -> String {
        format!("sdss_{}", PARAMS[index].1)
    }

    fn accepts<T: Datatype>() -> bool {
        // Coordinates are floating point; integer keys cannot represent
        // them without losing order among sub-degree values.
        !T::HAS_UNSIGNED_KEY
    }

    fn fill<T: Datatype>(dst: &mut [T], index: usize, _pool: &Pool) -> Result<(), DatasetError> {
        let coords = CACHE.get_or_load(load)?;
        copy_clamped(Self::NAME, dst, Self::column(&coords, index), |&v| {
            T::from_double(v)
        });
        Ok(())
    }

    fn data_size(index: usize) -> Result<usize, DatasetError> {
        let coords = CACHE.get_or_load(load)?;
        Ok(Self::column(&coords, index).len())
    }
}
