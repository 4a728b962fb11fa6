//! Sort benchmark CLI.
//!
//! Usage:
//!   sortbench -m <machine> -t <threads> -b <log2 bytes> -e <log2 bytes>
//!             [-i info] [-r runs] [-c]
//!             [-d datatype]... [-g generator]... [-a algorithm]... [-v vector]...
//!             [--ctl-pipe path] [--ack-pipe path]
//!
//! Result lines go to stdout; logging goes to stderr (set RUST_LOG).

use std::env;
use std::io::Write;
use std::process::ExitCode;

use log::error;

use sortbench::{registry, Config};

fn print_usage(out: &mut impl Write) {
    let _ = writeln!(
        out,
        "Usage: sortbench -m MACHINE -t THREADS -b LOGSIZE -e LOGSIZE [OPTIONS]

Required:
  -m, --machine NAME       machine name recorded in every result line
  -t, --threads N          worker threads for parallel algorithms
  -b, --beginlogsize N     log2 of the smallest input size, in bytes
  -e, --endlogsize N       log2 of the largest input size, in bytes

Options:
  -i, --info TEXT          extra text appended verbatim to result lines
  -r, --runs N             fixed repetition count (default: size-derived)
  -c, --copyback           copy generated data back single-threaded, even
                           for parallel algorithms
  -d, --datatype NAME      select a datatype (repeatable; default: all)
  -g, --generator NAME     select a generator (repeatable; default: all)
  -a, --algorithm NAME     select an algorithm (repeatable; default: all)
  -v, --vector NAME        select a memory layout (repeatable; default: all)
      --ctl-pipe PATH      profiler control FIFO
      --ack-pipe PATH      profiler acknowledgment FIFO
  -h, --help               show this help

Registered names:
  datatypes:  {}
  generators: {}
  algorithms: {}
  vectors:    {}",
        registry::DATATYPE_NAMES.join(" "),
        registry::GENERATOR_NAMES.join(" "),
        registry::ALGORITHM_NAMES.join(" "),
        registry::VECTOR_NAMES.join(" "),
    );
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage(&mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = match Config::parse_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sortbench: {e}");
            print_usage(&mut std::io::stderr());
            return ExitCode::from(2);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = registry::run_benchmark(&config, &mut out) {
        error!("benchmark aborted: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
