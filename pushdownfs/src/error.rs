//! Library error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort mounting.
///
/// Initialization failures are fatal by contract: the CLI terminates the
/// process rather than exposing a partial mount.
#[derive(Debug, Error)]
pub enum MountError {
    /// The mountpoint directory does not exist.
    #[error("mountpoint does not exist: {0}")]
    MountpointMissing(PathBuf),
    /// No worker executable is configured for the offload trigger.
    #[error("no worker executable configured")]
    WorkerUnset,
    /// A backing file could not be created or opened.
    #[error("failed to create backing file {path}: {source}")]
    Backing { path: PathBuf, source: io::Error },
    /// The FUSE session itself failed.
    #[error("FUSE session error: {0}")]
    Session(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mountpoint_missing() {
        let err = MountError::MountpointMissing(PathBuf::from("/mnt/gone"));
        assert!(err.to_string().contains("/mnt/gone"));
    }

    #[test]
    fn test_backing_error_keeps_source() {
        let err = MountError::Backing {
            path: PathBuf::from("/dev/shm/pushdown_command"),
            source: io::Error::from_raw_os_error(libc::EACCES),
        };
        assert!(err.to_string().contains("pushdown_command"));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().to_lowercase().contains("denied"));
    }
}
