//! Error taxonomy for the harness.
//!
//! Three failure families with different propagation rules:
//! - configuration mismatches are reported as warning records and skipped,
//! - dataset I/O failures are fatal (every configuration referencing the
//!   dataset needs it and there is no fallback),
//! - profiler protocol failures are logged and the run continues.

use thiserror::Error;

/// A dataset could not be loaded. Cloneable because the load-once cache
/// stores the outcome and replays it to every later caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("cannot open {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("{path}: truncated header")]
    TruncatedHeader { path: String },

    #[error("{path}: declared {declared} elements but parsed {parsed}")]
    SizeMismatch {
        path: String,
        declared: u64,
        parsed: u64,
    },

    #[error("{path}: short read ({context})")]
    ShortRead { path: String, context: String },

    #[error("I/O error reading {path}: {reason}")]
    Io { path: String, reason: String },
}

/// A profiler handshake went wrong. Never fatal to the run.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("short write sending '{command}': wrote {written} of {expected} bytes")]
    ShortWrite {
        command: &'static str,
        written: usize,
        expected: usize,
    },

    #[error("write of '{1}' failed: {0}")]
    Write(std::io::Error, &'static str),

    #[error("read of ack after '{1}' failed: {0}")]
    Read(std::io::Error, &'static str),

    #[error("profiler closed the ack channel after '{0}'")]
    ClosedByPeer(&'static str),

    #[error("malformed ack after '{command}': got {ack:?}")]
    BadAck { command: &'static str, ack: String },
}

/// Invalid command-line input. Reported before any run begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("missing required argument {0}")]
    MissingRequired(&'static str),

    #[error("invalid value '{value}' for {flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("unknown option {0}")]
    UnknownFlag(String),
}

/// Top-level failure of a benchmark invocation.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error("failed to write result stream: {0}")]
    Emit(#[from] std::io::Error),
}
