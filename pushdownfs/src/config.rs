//! Mount configuration.
//!
//! Pure data types assembled by the CLI before mounting; no parsing logic
//! lives here.

use crate::channel::ChannelLayout;
use std::path::PathBuf;

/// Default shared-memory directory holding the backing files.
pub const DEFAULT_BACKING_DIR: &str = "/dev/shm";

/// Default worker executable dispatched on command flushes.
///
/// Resolved through `PATH` unless an absolute path is configured.
pub const DEFAULT_WORKER: &str = "pushdown-worker";

/// Mount-time settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the backing files (shared-memory-backed).
    pub backing_dir: PathBuf,
    /// Channel configuration exposed at the mount root.
    pub layout: ChannelLayout,
    /// Worker executable spawned by the offload trigger.
    pub worker: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backing_dir: PathBuf::from(DEFAULT_BACKING_DIR),
            layout: ChannelLayout::default(),
            worker: PathBuf::from(DEFAULT_WORKER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.backing_dir, PathBuf::from("/dev/shm"));
        assert_eq!(settings.layout, ChannelLayout::Triple);
        assert_eq!(settings.worker, PathBuf::from("pushdown-worker"));
    }
}
