//! Dataset file formats and the process-wide load-once cache gate.
//!
//! Real-world generators keep their data here in two binary cache formats:
//!
//! - sequence-of-strings: `[u64 count][u64 len][bytes]...`, produced from
//!   FASTA input by [`fasta_to_string_cache`];
//! - columnar: `[u64 rows][u64 cols][col-major u64 values]`, no padding.
//!
//! Both use native byte order, as written by the host that produced the
//! cache. Any truncation or header/content disagreement is a fatal
//! [`DatasetError`]; a partially loaded dataset is never served.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::DatasetError;

/// One-shot cache slot for a real-world dataset parameter index.
///
/// The first caller runs the loader; concurrent first callers block until
/// it finishes; everyone (then and later) observes the same outcome,
/// including a load failure. The loader never runs twice in a process.
pub struct CacheSlot<T> {
    cell: OnceLock<Result<Arc<T>, DatasetError>>,
}

impl<T> CacheSlot<T> {
    pub const fn new() -> Self {
        CacheSlot {
            cell: OnceLock::new(),
        }
    }

    pub fn get_or_load(
        &self,
        load: impl FnOnce() -> Result<T, DatasetError>,
    ) -> Result<Arc<T>, DatasetError> {
        self.cell.get_or_init(|| load().map(Arc::new)).clone()
    }
}

impl<T> Default for CacheSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn open_err(path: &Path, e: &std::io::Error) -> DatasetError {
    DatasetError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn io_err(path: &Path, e: &std::io::Error) -> DatasetError {
    DatasetError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn read_u64(r: &mut impl Read) -> std::io::Result<u64> {
    let mut raw = [0u8; 8];
    r.read_exact(&mut raw)?;
    Ok(u64::from_ne_bytes(raw))
}

/// Read the whole file into a string, for the line-oriented text loaders.
pub fn read_text(path: &Path) -> Result<String, DatasetError> {
    let mut file = File::open(path).map_err(|e| open_err(path, &e))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| io_err(path, &e))?;
    Ok(text)
}

// ============================================================================
// Sequence-of-strings cache
// ============================================================================

/// Write `[u64 count][u64 len][bytes]...` to `path`.
pub fn write_string_cache(path: &Path, sequences: &[Vec<u8>]) -> Result<(), DatasetError> {
    let file = File::create(path).map_err(|e| open_err(path, &e))?;
    let mut w = BufWriter::new(file);
    let write = |w: &mut BufWriter<File>, bytes: &[u8]| {
        w.write_all(bytes).map_err(|e| io_err(path, &e))
    };
    write(&mut w, &(sequences.len() as u64).to_ne_bytes())?;
    for seq in sequences {
        write(&mut w, &(seq.len() as u64).to_ne_bytes())?;
        write(&mut w, seq)?;
    }
    w.flush().map_err(|e| io_err(path, &e))
}

/// Read a sequence-of-strings cache back. The declared count is
/// authoritative; running out of bytes before it is satisfied is fatal.
pub fn read_string_cache(path: &Path) -> Result<Vec<Vec<u8>>, DatasetError> {
    let file = File::open(path).map_err(|e| open_err(path, &e))?;
    let mut r = BufReader::new(file);

    let count = read_u64(&mut r).map_err(|_| DatasetError::TruncatedHeader {
        path: path.display().to_string(),
    })?;

    let mut sequences = Vec::with_capacity(count.min(1 << 24) as usize);
    for i in 0..count {
        let len = read_u64(&mut r).map_err(|_| DatasetError::ShortRead {
            path: path.display().to_string(),
            context: format!("length of sequence {i} of {count}"),
        })?;
        let mut seq = vec![0u8; len as usize];
        r.read_exact(&mut seq).map_err(|_| DatasetError::ShortRead {
            path: path.display().to_string(),
            context: format!("body of sequence {i} ({len} bytes)"),
        })?;
        sequences.push(seq);
    }
    Ok(sequences)
}

/// Parse FASTA text into one byte string per record: lines starting with
/// `>` open a record, subsequent lines are concatenated into its sequence.
pub fn parse_fasta(text: &str) -> Vec<Vec<u8>> {
    let mut records: Vec<Vec<u8>> = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            records.push(Vec::new());
        } else if let Some(current) = records.last_mut() {
            current.extend_from_slice(line.as_bytes());
        }
        // Sequence data before any header is malformed FASTA; dropped.
    }
    records
}

/// Convert a FASTA file into the binary sequence-of-strings cache.
pub fn fasta_to_string_cache(fasta: &Path, cache: &Path) -> Result<usize, DatasetError> {
    let records = parse_fasta(&read_text(fasta)?);
    write_string_cache(cache, &records)?;
    Ok(records.len())
}

// ============================================================================
// Columnar cache
// ============================================================================

/// Write `[u64 rows][u64 cols]` followed by each column's values. All
/// columns must have the same length.
pub fn write_columns(path: &Path, columns: &[Vec<u64>]) -> Result<(), DatasetError> {
    let rows = columns.first().map_or(0, Vec::len);
    debug_assert!(columns.iter().all(|c| c.len() == rows));

    let file = File::create(path).map_err(|e| open_err(path, &e))?;
    let mut w = BufWriter::new(file);
    let write = |w: &mut BufWriter<File>, bytes: &[u8]| {
        w.write_all(bytes).map_err(|e| io_err(path, &e))
    };
    write(&mut w, &(rows as u64).to_ne_bytes())?;
    write(&mut w, &(columns.len() as u64).to_ne_bytes())?;
    for column in columns {
        for value in column {
            write(&mut w, &value.to_ne_bytes())?;
        }
    }
    w.flush().map_err(|e| io_err(path, &e))
}

/// Read a columnar cache back, verifying the header against the actual
/// payload size.
pub fn read_columns(path: &Path) -> Result<Vec<Vec<u64>>, DatasetError> {
    let file = File::open(path).map_err(|e| open_err(path, &e))?;
    let total = file
        .metadata()
        .map_err(|e| io_err(path, &e))?
        .len();
    let mut r = BufReader::new(file);

    let truncated = || DatasetError::TruncatedHeader {
        path: path.display().to_string(),
    };
    let rows = read_u64(&mut r).map_err(|_| truncated())?;
    let cols = read_u64(&mut r).map_err(|_| truncated())?;

    let declared = rows
        .checked_mul(cols)
        .and_then(|v| v.checked_mul(8))
        .and_then(|v| v.checked_add(16))
        .ok_or_else(truncated)?;
    if declared != total {
        return Err(DatasetError::SizeMismatch {
            path: path.display().to_string(),
            declared: declared - 16,
            parsed: total.saturating_sub(16),
        });
    }

    let mut columns = Vec::with_capacity(cols as usize);
    for c in 0..cols {
        let mut column = Vec::with_capacity(rows as usize);
        for row in 0..rows {
            column.push(read_u64(&mut r).map_err(|_| DatasetError::ShortRead {
                path: path.display().to_string(),
                context: format!("column {c}, row {row}"),
            })?);
        }
        columns.push(column);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("sortbench-test-{}-{name}", std::process::id()));
        p
    }

    #[test]
    fn fasta_round_trip_through_binary_cache() {
        let fasta = temp_path("roundtrip.fasta");
        let cache = temp_path("roundtrip.bin");
        std::fs::write(&fasta, ">seq1\nACGU\n>seq2\nGGCC\n").unwrap();

        let count = fasta_to_string_cache(&fasta, &cache).unwrap();
        assert_eq!(count, 2);

        let back = read_string_cache(&cache).unwrap();
        assert_eq!(back, vec![b"ACGU".to_vec(), b"GGCC".to_vec()]);

        std::fs::remove_file(&fasta).ok();
        std::fs::remove_file(&cache).ok();
    }

    #[test]
    fn fasta_joins_wrapped_sequence_lines() {
        let records = parse_fasta(">a\nAC\nGU\n\n>b\nGG\n");
        assert_eq!(records, vec![b"ACGU".to_vec(), b"GG".to_vec()]);
    }

    #[test]
    fn string_cache_detects_truncation() {
        let path = temp_path("truncated.bin");
        // Header claims 3 sequences, body carries none.
        std::fs::write(&path, 3u64.to_ne_bytes()).unwrap();
        match read_string_cache(&path) {
            Err(DatasetError::ShortRead { .. }) => {}
            other => panic!("expected ShortRead, got {other:?}"),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn columnar_round_trip_and_size_check() {
        let path = temp_path("columns.bin");
        let columns = vec![vec![1u64, 2, 3], vec![10u64, 20, 30]];
        write_columns(&path, &columns).unwrap();
        assert_eq!(read_columns(&path).unwrap(), columns);

        // Chop the last value off: header now disagrees with the payload.
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();
        match read_columns(&path) {
            Err(DatasetError::SizeMismatch { .. }) => {}
            other => panic!("expected SizeMismatch, got {other:?}"),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn cache_slot_loads_exactly_once_under_contention() {
        static LOADS: AtomicUsize = AtomicUsize::new(0);
        let slot: CacheSlot<Vec<u64>> = CacheSlot::new();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let data = slot
                        .get_or_load(|| {
                            LOADS.fetch_add(1, Ordering::SeqCst);
                            Ok(vec![1, 2, 3])
                        })
                        .unwrap();
                    assert_eq!(*data, vec![1, 2, 3]);
                });
            }
        });
        assert_eq!(LOADS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cache_slot_replays_failures() {
        let slot: CacheSlot<Vec<u64>> = CacheSlot::new();
        let fail = || {
            Err(DatasetError::Open {
                path: "nowhere".into(),
                reason: "gone".into(),
            })
        };
        assert!(slot.get_or_load(fail).is_err());
        // Second caller must observe the stored failure without reloading.
        let err = slot
            .get_or_load(|| panic!("loader must not run twice"))
            .unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
