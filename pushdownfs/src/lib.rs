//! PushdownFS - file I/O as an RPC trigger.
//!
//! This library mounts a small fixed namespace of synthetic files backed by
//! regular files on shared-memory storage: one writable `command` channel and
//! one or more read channels (`result`, or `res0`..`res2`). Writing a request
//! to `command` and flushing or closing it synchronously dispatches an
//! external worker process; the worker reads the command from its backing
//! path, writes its output to the result backing path(s), and the caller
//! reads the result channel(s) back through the mount.
//!
//! # High-Level API
//!
//! ```ignore
//! use pushdownfs::config::Settings;
//! use pushdownfs::mount::mount_blocking;
//!
//! let settings = Settings::default();
//! mount_blocking(&settings, std::path::Path::new("/mnt/pushdown"))?;
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod fuse;
pub mod logging;
pub mod mount;
pub mod offload;
pub mod router;

/// Version of the pushdownfs library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
