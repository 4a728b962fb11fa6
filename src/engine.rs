//! Experiment engine: size sweep, repetition policy, and the per-run
//! generate / copy-back / check / time / emit sequence.
//!
//! The user configures a *byte* budget range; the engine converts it to an
//! element-count range per datatype. Only the algorithm's own sort call
//! sits inside the profiler bracket; generation and checking stay outside
//! so external samples reflect the algorithm alone.

use std::io::Write;
use std::time::Instant;

use log::error;

use crate::algorithm::{millis_since, SortAlgorithm};
use crate::config::Config;
use crate::datatype::Datatype;
use crate::error::BenchError;
use crate::generator::Generator;
use crate::layout::DataLayout;
use crate::parallel::Pool;
use crate::profiler::PerfControl;
use crate::report::{self, CheckerReport, RunRecord};

#[cfg(feature = "checker")]
use crate::checker::ParallelChecker;

/// Shared state threaded through the dispatch chain.
pub struct RunContext<'a, W: Write> {
    pub config: &'a Config,
    pub pool: &'a Pool,
    pub perf: &'a mut PerfControl,
    pub out: &'a mut W,
}

/// Convert the configured log2 *byte* range into a log2 *element-count*
/// range for `T`, clamping to a minimum of one element.
pub fn log_sizes<T: Datatype>(config: &Config) -> (u32, u32) {
    let type_log = std::mem::size_of::<T>().next_power_of_two().trailing_zeros();
    let min = if config.begin_logn >= type_log {
        config.begin_logn - type_log
    } else {
        1
    };
    let max = if config.end_logn >= type_log {
        config.end_logn - type_log
    } else {
        1
    };
    (min, max)
}

/// Repetition policy: an explicit count always wins; otherwise 15 runs
/// while the working set is small enough to keep total wall-clock time
/// reasonable (2^33 bytes for parallel algorithms, 2^30 sequential), 2
/// runs beyond that.
pub fn num_runs<T: Datatype>(config: &Config, size: usize, parallel: bool) -> usize {
    if let Some(runs) = config.runs {
        return runs;
    }
    let bytes = std::mem::size_of::<T>() as u64 * size as u64;
    let small_limit = if parallel { 1u64 << 33 } else { 1u64 << 30 };
    if bytes < small_limit {
        15
    } else {
        2
    }
}

/// Run one fully selected (datatype, generator, algorithm, layout)
/// combination for one generator parameter index.
pub fn exec<T, G, A, V, W>(ctx: &mut RunContext<'_, W>, index: usize) -> Result<(), BenchError>
where
    T: Datatype,
    G: Generator,
    A: SortAlgorithm,
    V: DataLayout<T>,
    W: Write,
{
    if G::SIZE_FROM_DATA {
        // The dataset dictates the size; no sweep. A load failure here is
        // fatal for the whole process, there is no fallback data.
        let size = G::data_size(index)?;
        let mut buf = V::allocate(size, ctx.pool);
        for run in 0..num_runs::<T>(ctx.config, size, A::PARALLEL) {
            run_one::<T, G, A, V, W>(ctx, &mut buf, size, index, run)?;
        }
        return Ok(());
    }

    let (min_log, max_log) = log_sizes::<T>(ctx.config);
    let mut size = 1usize << min_log;
    while size <= (1usize << max_log) {
        let mut buf = V::allocate(size, ctx.pool);
        for run in 0..num_runs::<T>(ctx.config, size, A::PARALLEL) {
            run_one::<T, G, A, V, W>(ctx, &mut buf, size, index, run)?;
        }
        size *= 2;
    }
    Ok(())
}

fn run_one<T, G, A, V, W>(
    ctx: &mut RunContext<'_, W>,
    buf: &mut V,
    size: usize,
    index: usize,
    run: usize,
) -> Result<(), BenchError>
where
    T: Datatype,
    G: Generator,
    A: SortAlgorithm,
    V: DataLayout<T>,
    W: Write,
{
    let gen_start = Instant::now();
    G::fill(buf.as_mut_slice(), index, ctx.pool)?;

    // Sequential algorithms always get a copy-back; parallel ones only on
    // request. The single-threaded copy re-places the pages a parallel
    // generator first-touched across the machine.
    let copyback = !A::PARALLEL || ctx.config.copyback;
    if copyback {
        let mut fresh = V::allocate(size, ctx.pool);
        fresh.as_mut_slice().copy_from_slice(buf.as_slice());
        *buf = fresh;
    }
    let generator_ms = millis_since(gen_start);

    #[cfg(feature = "checker")]
    let mut checker = ParallelChecker::new();
    #[cfg(feature = "checker")]
    let mut checker_ms = 0.0;
    #[cfg(feature = "checker")]
    {
        let t = Instant::now();
        checker.record_pre(buf.as_slice(), ctx.pool);
        checker_ms += millis_since(t);
    }

    if let Err(e) = ctx.perf.start() {
        error!("profiler start failed, continuing unprofiled: {e}");
    }
    let timing = A::sort(buf.as_mut_slice(), ctx.pool);
    if let Err(e) = ctx.perf.stop() {
        error!("profiler stop failed: {e}");
    }

    #[cfg(feature = "checker")]
    let checker_report = {
        let t = Instant::now();
        checker.record_post(buf.as_slice(), ctx.pool);
        checker_ms += millis_since(t);
        CheckerReport::Enabled {
            millis: checker_ms,
            sorted: checker.likely_sorted(),
            permuted: checker.likely_permuted(),
        }
    };
    #[cfg(not(feature = "checker"))]
    let checker_report = CheckerReport::Disabled;

    report::emit(
        ctx.out,
        &RunRecord {
            machine: &ctx.config.machine,
            generator: G::param_name(index),
            datatype: T::NAME,
            algo: A::NAME,
            parallel: A::PARALLEL,
            threads: ctx.config.num_threads,
            vector: V::NAME,
            copyback,
            size,
            run,
            checker: checker_report,
            generator_ms,
            preproc_ms: timing.preproc_ms,
            sort_ms: timing.sort_ms,
            info: &ctx.config.info,
        },
    )?;
    Ok(())
}
