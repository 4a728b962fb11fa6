//! Benchmark configuration.
//!
//! Built once from CLI input, read-only afterwards. Name filters select
//! registry entries; an empty selection means "all registered". Unknown
//! names are kept (they simply match nothing and produce no runs).

use std::path::PathBuf;

use crate::error::ArgError;
use crate::profiler::{DEFAULT_ACK_PATH, DEFAULT_CTL_PATH};
use crate::registry;

/// Immutable run-time configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub machine: String,
    /// Free-form suffix appended verbatim to every result line.
    pub info: String,
    pub num_threads: usize,
    /// Log2 of the minimum input size in bytes.
    pub begin_logn: u32,
    /// Log2 of the maximum input size in bytes, inclusive.
    pub end_logn: u32,
    /// Explicit run count; `None` means policy-derived.
    pub runs: Option<usize>,
    pub copyback: bool,
    pub datatypes: Vec<String>,
    pub generators: Vec<String>,
    pub algos: Vec<String>,
    pub vectors: Vec<String>,
    pub ctl_path: PathBuf,
    pub ack_path: PathBuf,
}

fn all(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn next_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, ArgError> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| ArgError::MissingValue(args[*i - 1].clone()))
}

fn parse_number<N: std::str::FromStr>(flag: &str, value: &str) -> Result<N, ArgError> {
    value.parse().map_err(|_| ArgError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
        reason: "not a valid number".to_string(),
    })
}

impl Config {
    /// Parse CLI arguments (without the program name).
    pub fn parse_args(args: &[String]) -> Result<Config, ArgError> {
        let mut machine: Option<String> = None;
        let mut info = String::new();
        let mut threads: Option<usize> = None;
        let mut begin_logn: Option<u32> = None;
        let mut end_logn: Option<u32> = None;
        let mut runs: Option<usize> = None;
        let mut copyback = false;
        let mut datatypes: Vec<String> = Vec::new();
        let mut generators: Vec<String> = Vec::new();
        let mut algos: Vec<String> = Vec::new();
        let mut vectors: Vec<String> = Vec::new();
        let mut ctl_path = PathBuf::from(DEFAULT_CTL_PATH);
        let mut ack_path = PathBuf::from(DEFAULT_ACK_PATH);

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "-m" | "--machine" => machine = Some(next_value(args, &mut i)?.to_string()),
                "-i" | "--info" => info = next_value(args, &mut i)?.to_string(),
                "-t" | "--threads" => {
                    threads = Some(parse_number(flag, next_value(args, &mut i)?)?);
                }
                "-b" | "--beginlogsize" => {
                    begin_logn = Some(parse_number(flag, next_value(args, &mut i)?)?);
                }
                "-e" | "--endlogsize" => {
                    end_logn = Some(parse_number(flag, next_value(args, &mut i)?)?);
                }
                "-r" | "--runs" => runs = Some(parse_number(flag, next_value(args, &mut i)?)?),
                "-c" | "--copyback" => copyback = true,
                "-d" | "--datatype" => datatypes.push(next_value(args, &mut i)?.to_string()),
                "-g" | "--generator" => generators.push(next_value(args, &mut i)?.to_string()),
                "-a" | "--algorithm" => algos.push(next_value(args, &mut i)?.to_string()),
                "-v" | "--vector" => vectors.push(next_value(args, &mut i)?.to_string()),
                "--ctl-pipe" => ctl_path = PathBuf::from(next_value(args, &mut i)?),
                "--ack-pipe" => ack_path = PathBuf::from(next_value(args, &mut i)?),
                other => return Err(ArgError::UnknownFlag(other.to_string())),
            }
            i += 1;
        }

        let machine = machine.ok_or(ArgError::MissingRequired("--machine"))?;
        let num_threads = threads.ok_or(ArgError::MissingRequired("--threads"))?;
        let begin_logn = begin_logn.ok_or(ArgError::MissingRequired("--beginlogsize"))?;
        let end_logn = end_logn.ok_or(ArgError::MissingRequired("--endlogsize"))?;

        if num_threads == 0 {
            return Err(ArgError::InvalidValue {
                flag: "--threads".to_string(),
                value: "0".to_string(),
                reason: "at least one thread is required".to_string(),
            });
        }
        if begin_logn > end_logn {
            return Err(ArgError::InvalidValue {
                flag: "--endlogsize".to_string(),
                value: end_logn.to_string(),
                reason: format!("must be >= beginlogsize ({begin_logn})"),
            });
        }

        if datatypes.is_empty() {
            datatypes = all(registry::DATATYPE_NAMES);
        }
        if generators.is_empty() {
            generators = all(registry::GENERATOR_NAMES);
        }
        if algos.is_empty() {
            algos = all(registry::ALGORITHM_NAMES);
        }
        if vectors.is_empty() {
            vectors = all(registry::VECTOR_NAMES);
        }

        Ok(Config {
            machine,
            info,
            num_threads,
            begin_logn,
            end_logn,
            runs,
            copyback,
            datatypes,
            generators,
            algos,
            vectors,
            ctl_path,
            ack_path,
        })
    }
}
