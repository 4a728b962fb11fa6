//! Static registry of datatypes, generators, algorithms and memory
//! layouts, plus the dispatch chain that turns name filters into
//! monomorphized experiment runs.
//!
//! Selection walks datatype -> generator -> algorithm -> layout in
//! declaration order, binding one more type parameter at each level, so
//! the innermost loop runs fully monomorphized code with no dynamic
//! dispatch. Capability mismatches between a selected generator or
//! algorithm and the current datatype produce a `configwarning` record
//! instead of a run.

use std::io::Write;

use crate::algorithm::{DoNothing, ParSort, QuickSort, RadixSort, SortAlgorithm};
use crate::config::Config;
use crate::datatype::{Datatype, KeyValuePair};
use crate::engine::{exec, RunContext};
use crate::error::BenchError;
use crate::generator::{GenGraph, GenRna, GenSdss, GenUniform, GenZipf, Generator};
use crate::layout::{AlignedBuf, DataLayout, InterleavedBuf};
use crate::parallel::Pool;
use crate::profiler::PerfControl;
use crate::report::{self, ConfigWarning};

/// All registered datatype names, in dispatch order.
pub const DATATYPE_NAMES: &[&str] = &[
    <u32 as Datatype>::NAME,
    <u64 as Datatype>::NAME,
    <f64 as Datatype>::NAME,
    KeyValuePair::NAME,
];

/// All registered generator names, in dispatch order.
pub const GENERATOR_NAMES: &[&str] = &[
    GenUniform::NAME,
    GenZipf::NAME,
    GenGraph::NAME,
    GenSdss::NAME,
    GenRna::NAME,
];

/// All registered algorithm names, in dispatch order.
pub const ALGORITHM_NAMES: &[&str] = &[
    DoNothing::NAME,
    QuickSort::NAME,
    ParSort::NAME,
    RadixSort::NAME,
];

/// All registered layout names, in dispatch order.
pub const VECTOR_NAMES: &[&str] = &[
    AlignedBuf::<u64>::NAME,
    InterleavedBuf::<u64>::NAME,
];

fn selected(filter: &[String], name: &str) -> bool {
    filter.iter().any(|f| f == name)
}

fn select_vector<T, G, A, W>(ctx: &mut RunContext<'_, W>, index: usize) -> Result<(), BenchError>
where
    T: Datatype,
    G: Generator,
    A: SortAlgorithm,
    W: Write,
{
    if selected(&ctx.config.vectors, AlignedBuf::<T>::NAME) {
        exec::<T, G, A, AlignedBuf<T>, W>(ctx, index)?;
    }
    if selected(&ctx.config.vectors, InterleavedBuf::<T>::NAME) {
        exec::<T, G, A, InterleavedBuf<T>, W>(ctx, index)?;
    }
    Ok(())
}

fn select_algorithm<T, G, W>(ctx: &mut RunContext<'_, W>, index: usize) -> Result<(), BenchError>
where
    T: Datatype,
    G: Generator,
    W: Write,
{
    macro_rules! try_algo {
        ($algo:ty) => {
            if selected(&ctx.config.algos, <$algo>::NAME) {
                if <$algo>::accepts::<T>() {
                    select_vector::<T, G, $algo, W>(ctx, index)?;
                } else {
                    report::emit_warning(
                        ctx.out,
                        &ConfigWarning::AlgoDatatype {
                            algo: <$algo>::NAME,
                            datatype: T::NAME,
                        },
                    )?;
                }
            }
        };
    }
    try_algo!(DoNothing);
    try_algo!(QuickSort);
    try_algo!(ParSort);
    try_algo!(RadixSort);
    Ok(())
}

fn select_generator<T, W>(ctx: &mut RunContext<'_, W>) -> Result<(), BenchError>
where
    T: Datatype,
    W: Write,
{
    macro_rules! try_gen {
        ($gen:ty) => {
            if selected(&ctx.config.generators, <$gen>::NAME) {
                if <$gen>::accepts::<T>() {
                    for index in 0..<$gen>::num_params() {
                        select_algorithm::<T, $gen, W>(ctx, index)?;
                    }
                } else {
                    report::emit_warning(
                        ctx.out,
                        &ConfigWarning::GenDatatype {
                            generator: <$gen>::NAME,
                            datatype: T::NAME,
                        },
                    )?;
                }
            }
        };
    }
    try_gen!(GenUniform);
    try_gen!(GenZipf);
    try_gen!(GenGraph);
    try_gen!(GenSdss);
    try_gen!(GenRna);
    Ok(())
}

fn select_datatype<T, W>(ctx: &mut RunContext<'_, W>) -> Result<(), BenchError>
where
    T: Datatype,
    W: Write,
{
    if selected(&ctx.config.datatypes, T::NAME) {
        select_generator::<T, W>(ctx)?;
    }
    Ok(())
}

/// Run every selected combination against the given output stream.
///
/// Builds the thread pool and profiler handle, then walks the registry in
/// declaration order. Returns after the full sweep or on the first fatal
/// error (dataset load failure, pool construction, output I/O).
pub fn run_benchmark<W: Write>(config: &Config, out: &mut W) -> Result<(), BenchError> {
    let pool = Pool::new(config.num_threads)?;
    let mut perf = PerfControl::connect(&config.ctl_path, &config.ack_path);
    let mut ctx = RunContext {
        config,
        pool: &pool,
        perf: &mut perf,
        out,
    };
    select_datatype::<u32, W>(&mut ctx)?;
    select_datatype::<u64, W>(&mut ctx)?;
    select_datatype::<f64, W>(&mut ctx)?;
    select_datatype::<KeyValuePair, W>(&mut ctx)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(extra: &[&str]) -> String {
        let mut args: Vec<String> = ["-m", "reg", "-t", "2", "-b", "9", "-e", "9", "-r", "1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.extend(extra.iter().map(|s| s.to_string()));
        let config = Config::parse_args(&args).unwrap();
        let mut out = Vec::new();
        run_benchmark(&config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn name_tables_match_the_dispatch_chain() {
        assert_eq!(DATATYPE_NAMES, &["uint32", "uint64", "double", "pair"]);
        assert_eq!(GENERATOR_NAMES, &["uniform", "zipf", "graph", "sdss", "rna"]);
        assert_eq!(ALGORITHM_NAMES, &["donothing", "quicksort", "parsort", "radix"]);
        assert_eq!(VECTOR_NAMES, &["aligned", "interleaved"]);
    }

    #[test]
    fn selected_combination_produces_result_lines() {
        let out = run(&[
            "-d", "uint64", "-g", "uniform", "-a", "quicksort", "-v", "aligned",
        ]);
        let lines: Vec<&str> = out.lines().collect();
        // 2^9 bytes of 8-byte elements: a single size, one run.
        assert_eq!(lines.len(), 1);
        assert!(lines[0]
            .starts_with("RESULT\tmachine=reg\tgen=uniform\tdatatype=uint64\talgo=quicksort\t"));
        assert!(lines[0].contains("\tsize=64\t"));
        assert!(lines[0].contains("\tbenchmarkconfigerror=0\t"));
    }

    #[test]
    fn incompatible_algorithm_yields_config_warning() {
        // Radix needs an unsigned key; double has none.
        let out = run(&[
            "-d", "double", "-g", "uniform", "-a", "radix", "-v", "aligned",
        ]);
        assert_eq!(out, "RESULT\talgo=radix\tconfigwarning=1\tdatatype=double\n");
    }

    #[test]
    fn incompatible_generator_yields_config_warning() {
        // The graph generator emits key/value pairs only.
        let out = run(&[
            "-d", "uint32", "-g", "graph", "-a", "quicksort", "-v", "aligned",
        ]);
        assert_eq!(out, "RESULT\tgen=graph\tconfigwarning=1\tdatatype=uint32\n");
    }

    #[test]
    fn unknown_names_match_nothing() {
        let out = run(&["-d", "uint64", "-g", "uniform", "-a", "no-such-sort"]);
        assert!(out.is_empty());
    }

    #[test]
    fn zipf_sweeps_every_parameter_set() {
        let out = run(&[
            "-d", "uint64", "-g", "zipf", "-a", "donothing", "-v", "aligned",
        ]);
        let gens: Vec<&str> = out
            .lines()
            .filter_map(|l| l.split('\t').find(|f| f.starts_with("gen=")))
            .collect();
        assert_eq!(
            gens,
            vec![
                "gen=zipf_s=0.5_N=1000000",
                "gen=zipf_s=0.75_N=1500000",
                "gen=zipf_s=0.9_N=2000000"
            ]
        );
    }
}
