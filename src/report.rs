//! Result stream formatting.
//!
//! One tab-separated `key=value` line per run on stdout, fixed field
//! order, machine-parsable by the downstream analysis scripts. Records are
//! emitted immediately and never retained.

use std::fmt;
use std::io::Write;

/// Checker outcome attached to a run record.
#[derive(Clone, Copy, Debug)]
pub enum CheckerReport {
    /// Checker compiled out for pure-timing builds.
    Disabled,
    Enabled {
        millis: f64,
        sorted: bool,
        permuted: bool,
    },
}

/// One row of output per timed run.
#[derive(Debug)]
pub struct RunRecord<'a> {
    pub machine: &'a str,
    pub generator: String,
    pub datatype: &'static str,
    pub algo: &'static str,
    pub parallel: bool,
    pub threads: usize,
    pub vector: &'static str,
    pub copyback: bool,
    pub size: usize,
    pub run: usize,
    pub checker: CheckerReport,
    pub generator_ms: f64,
    pub preproc_ms: f64,
    pub sort_ms: f64,
    pub info: &'a str,
}

fn flag(b: bool) -> u8 {
    b as u8
}

impl fmt::Display for RunRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RESULT\tmachine={}\tgen={}\tdatatype={}\talgo={}\tparallel={}\t\
             threads={}\tvector={}\tcopyback={}\tsize={}\trun={}\t\
             benchmarkconfigerror=0",
            self.machine,
            self.generator,
            self.datatype,
            self.algo,
            flag(self.parallel),
            self.threads,
            self.vector,
            flag(self.copyback),
            self.size,
            self.run,
        )?;
        match self.checker {
            CheckerReport::Disabled => write!(
                f,
                "\tcheckermilli=0\tsortedsequence=DISABLED\tpermutation=DISABLED"
            )?,
            CheckerReport::Enabled {
                millis,
                sorted,
                permuted,
            } => write!(
                f,
                "\tcheckermilli={millis}\tsortedsequence={sorted}\tpermutation={permuted}"
            )?,
        }
        write!(
            f,
            "\tgeneratormilli={}\tpreprocmilli={}\tmilli={}{}",
            self.generator_ms, self.preproc_ms, self.sort_ms, self.info
        )
    }
}

/// A combination rejected at selection time by a capability predicate.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Algorithm cannot operate on the datatype.
    AlgoDatatype {
        algo: &'static str,
        datatype: &'static str,
    },
    /// Generator cannot emit the datatype.
    GenDatatype {
        generator: &'static str,
        datatype: &'static str,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::AlgoDatatype { algo, datatype } => {
                write!(f, "RESULT\talgo={algo}\tconfigwarning=1\tdatatype={datatype}")
            }
            ConfigWarning::GenDatatype {
                generator,
                datatype,
            } => {
                write!(f, "RESULT\tgen={generator}\tconfigwarning=1\tdatatype={datatype}")
            }
        }
    }
}

pub fn emit(out: &mut impl Write, record: &RunRecord<'_>) -> std::io::Result<()> {
    writeln!(out, "{record}")
}

pub fn emit_warning(out: &mut impl Write, warning: &ConfigWarning) -> std::io::Result<()> {
    writeln!(out, "{warning}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunRecord<'static> {
        RunRecord {
            machine: "testhost",
            generator: "uniform".to_string(),
            datatype: "uint64",
            algo: "parsort",
            parallel: true,
            threads: 8,
            vector: "aligned",
            copyback: false,
            size: 1024,
            run: 3,
            checker: CheckerReport::Enabled {
                millis: 1.5,
                sorted: true,
                permuted: true,
            },
            generator_ms: 2.25,
            preproc_ms: 0.0,
            sort_ms: 10.5,
            info: "\tnote=smoke",
        }
    }

    #[test]
    fn run_record_field_order_is_fixed() {
        let line = sample().to_string();
        assert_eq!(
            line,
            "RESULT\tmachine=testhost\tgen=uniform\tdatatype=uint64\talgo=parsort\t\
             parallel=1\tthreads=8\tvector=aligned\tcopyback=0\tsize=1024\trun=3\t\
             benchmarkconfigerror=0\tcheckermilli=1.5\tsortedsequence=true\t\
             permutation=true\tgeneratormilli=2.25\tpreprocmilli=0\tmilli=10.5\t\
             note=smoke"
        );
    }

    #[test]
    fn disabled_checker_prints_placeholders() {
        let mut record = sample();
        record.checker = CheckerReport::Disabled;
        let line = record.to_string();
        assert!(line.contains("\tcheckermilli=0\tsortedsequence=DISABLED\tpermutation=DISABLED\t"));
    }

    #[test]
    fn warning_records_name_the_rejected_pair() {
        let w = ConfigWarning::AlgoDatatype {
            algo: "radix",
            datatype: "double",
        };
        assert_eq!(
            w.to_string(),
            "RESULT\talgo=radix\tconfigwarning=1\tdatatype=double"
        );
        let w = ConfigWarning::GenDatatype {
            generator: "graph",
            datatype: "uint32",
        };
        assert_eq!(
            w.to_string(),
            "RESULT\tgen=graph\tconfigwarning=1\tdatatype=uint32"
        );
    }
}
