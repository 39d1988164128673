//! The write-then-flush offload protocol.
//!
//! A write to the command channel never triggers anything by itself; it only
//! leaves bytes in the backing file. The flush (or fsync) that follows is
//! the trigger point: a non-empty command file arms the trigger and
//! dispatches the external worker synchronously, blocking the caller until
//! the worker exits.

use crate::channel::BackingChannel;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure modes of a flush-triggered offload.
#[derive(Debug, Error)]
pub enum OffloadError {
    /// Sizing the command backing file failed.
    #[error("failed to size command channel: {0}")]
    Backing(#[source] io::Error),
    /// The worker executable could not be spawned.
    #[error("failed to spawn offload worker: {0}")]
    Spawn(#[source] io::Error),
    /// The worker ran but did not exit cleanly.
    #[error("offload worker exited with {0}")]
    WorkerFailed(std::process::ExitStatus),
}

impl OffloadError {
    /// Errno surfaced on the caller's flush: backing failures keep their OS
    /// code, worker problems collapse to `EIO` (exit-code detail is not
    /// preserved).
    pub fn errno(&self) -> i32 {
        match self {
            OffloadError::Backing(e) => e.raw_os_error().unwrap_or(libc::EIO),
            OffloadError::Spawn(_) | OffloadError::WorkerFailed(_) => libc::EIO,
        }
    }
}

/// Synchronous subprocess dispatch driven by command-channel flushes.
///
/// The argument vector is fixed at mount time: the backing paths of the
/// command file and each result file, positionally. The command *payload*
/// is never passed as an argument; the worker reads it from the backing
/// path directly.
///
/// Firing never consumes the command bytes, so another flush on a still
/// non-empty file dispatches the worker again.
pub struct OffloadTrigger {
    program: PathBuf,
    args: Vec<PathBuf>,
}

impl OffloadTrigger {
    /// `args` is the ordered backing-path list (command first, then
    /// results), as produced by the channel registry.
    pub fn new(program: PathBuf, args: Vec<PathBuf>) -> Self {
        Self { program, args }
    }

    /// The worker executable this trigger dispatches.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Flush handler for the command channel.
    ///
    /// An empty backing file means nothing to do: succeed without
    /// dispatching. Otherwise spawn the worker and block until it exits.
    /// `std::process::Command` reports child-side exec failures back to the
    /// parent as a spawn error, so they can never be mistaken for a clean
    /// worker exit.
    pub fn flush(&self, command: &BackingChannel) -> Result<(), OffloadError> {
        let size = command.size().map_err(OffloadError::Backing)?;
        if size == 0 {
            debug!("command channel empty; nothing to dispatch");
            return Ok(());
        }

        info!(
            size,
            program = %self.program.display(),
            "command channel armed; dispatching offload worker"
        );
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(OffloadError::Spawn)?;

        if status.success() {
            debug!("offload worker completed");
            Ok(())
        } else {
            warn!(%status, "offload worker failed");
            Err(OffloadError::WorkerFailed(status))
        }
    }
}
