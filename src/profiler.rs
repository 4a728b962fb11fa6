//! Handshake with an out-of-process sampling profiler (perf-style control
//! FIFOs).
//!
//! Two named pipes: the harness writes commands to the control channel and
//! blocks for an acknowledgment on the ack channel. `perf stat`/`perf
//! record` understand exactly this exchange via `--control fifo:ctl,ack`.
//! The channels open once per process; if opening fails the handle is
//! disconnected and every signal call is a successful no-op, so the
//! harness runs identically with or without a profiler attached.
//!
//! There is deliberately no timeout: opening a FIFO blocks until the
//! profiler attaches the other end.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use log::{info, warn};

use crate::error::ProtocolError;

pub const DEFAULT_CTL_PATH: &str = "/tmp/sortbench_perf_ctl.fifo";
pub const DEFAULT_ACK_PATH: &str = "/tmp/sortbench_perf_ack.fifo";

/// Longest acknowledgment we accept, matching perf's control protocol.
const ACK_BUF_LEN: usize = 31;

struct Channels {
    ctl: File,
    ack: File,
}

/// Process-wide profiler handle.
pub struct PerfControl {
    channels: Option<Channels>,
}

impl PerfControl {
    /// A handle with no profiler attached; every call is a no-op success.
    pub fn disconnected() -> Self {
        PerfControl { channels: None }
    }

    /// Open both channels. Blocks until the profiler opens its ends. On
    /// failure (typically: the FIFOs do not exist because no profiler was
    /// set up) the handle comes back disconnected, with a log line saying
    /// why.
    pub fn connect(ctl_path: &Path, ack_path: &Path) -> Self {
        let ctl = match OpenOptions::new().write(true).open(ctl_path) {
            Ok(f) => f,
            Err(e) => {
                info!(
                    "profiler control channel {} unavailable ({e}); \
                     running without profiler signaling",
                    ctl_path.display()
                );
                return Self::disconnected();
            }
        };
        let ack = match File::open(ack_path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "profiler ack channel {} unavailable ({e}); \
                     running without profiler signaling",
                    ack_path.display()
                );
                return Self::disconnected();
            }
        };
        info!(
            "profiler channels open: ctl={}, ack={}",
            ctl_path.display(),
            ack_path.display()
        );
        PerfControl {
            channels: Some(Channels { ctl, ack }),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.channels.is_some()
    }

    /// Signal the profiler to start sampling. Call immediately before the
    /// timed region.
    pub fn start(&mut self) -> Result<(), ProtocolError> {
        self.exchange("enable")
    }

    /// Signal the profiler to stop sampling. Call immediately after the
    /// timed region.
    pub fn stop(&mut self) -> Result<(), ProtocolError> {
        self.exchange("disable")
    }

    /// Write the command plus NUL, then block for an `ack`-prefixed
    /// response. Disconnected handles report success without touching any
    /// channel.
    fn exchange(&mut self, command: &'static str) -> Result<(), ProtocolError> {
        let Some(channels) = self.channels.as_mut() else {
            return Ok(());
        };

        let mut payload = Vec::with_capacity(command.len() + 1);
        payload.extend_from_slice(command.as_bytes());
        payload.push(0);

        let written = channels
            .ctl
            .write(&payload)
            .map_err(|e| ProtocolError::Write(e, command))?;
        if written < payload.len() {
            return Err(ProtocolError::ShortWrite {
                command,
                written,
                expected: payload.len(),
            });
        }

        let mut ack = [0u8; ACK_BUF_LEN];
        let read = channels
            .ack
            .read(&mut ack)
            .map_err(|e| ProtocolError::Read(e, command))?;
        if read == 0 {
            return Err(ProtocolError::ClosedByPeer(command));
        }
        if read < 3 || &ack[..3] != b"ack" {
            return Err(ProtocolError::BadAck {
                command,
                ack: String::from_utf8_lossy(&ack[..read]).into_owned(),
            });
        }
        Ok(())
    }
}
