//! # Sortbench
//!
//! A benchmarking harness for parallel in-memory sorting algorithms.
//! Experiments are the cross product of datatype, input generator, sort
//! algorithm and memory layout, swept over a range of input sizes, with
//! every measurement emitted as one machine-parsable `RESULT` line.

pub mod algorithm;
pub mod checker;
pub mod config;
pub mod dataset;
pub mod datatype;
pub mod engine;
pub mod error;
pub mod generator;
pub mod layout;
pub mod parallel;
pub mod profiler;
pub mod registry;
pub mod report;

pub use config::Config;
pub use error::BenchError;
pub use registry::run_benchmark;
