//! Classification of virtual paths, names, and inodes.

use crate::channel::{ChannelLayout, VirtualFile};
use std::ffi::OsStr;

/// Root directory inode; channels occupy the consecutive inodes after it.
pub const ROOT_INODE: u64 = 1;

/// Where a virtual-filesystem request points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The synthetic root directory.
    Root,
    /// One of the configured channels.
    Channel(VirtualFile),
}

/// Maps path strings, directory-entry names, and inode numbers onto the
/// fixed channel set.
///
/// The namespace is flat and fixed at depth 1: the root plus the configured
/// channel names, matched exactly. No wildcard, prefix, or nested-path
/// matching exists.
#[derive(Debug, Clone, Copy)]
pub struct PathRouter {
    layout: ChannelLayout,
}

impl PathRouter {
    pub fn new(layout: ChannelLayout) -> Self {
        Self { layout }
    }

    /// Classify an absolute virtual path. `None` means no such entry.
    pub fn route_path(&self, path: &str) -> Option<Route> {
        if path == "/" {
            return Some(Route::Root);
        }
        // Channel names never contain a separator, so nested paths fall
        // through to "no such entry" here.
        let name = path.strip_prefix('/').unwrap_or(path);
        self.file_by_name(name).map(Route::Channel)
    }

    /// Resolve a name looked up under the root directory.
    pub fn route_name(&self, name: &OsStr) -> Option<VirtualFile> {
        self.file_by_name(name.to_str()?)
    }

    /// Inode assigned to a virtual file; stable for the mount's lifetime.
    pub fn inode(&self, file: VirtualFile) -> Option<u64> {
        let pos = self.layout.files().iter().position(|f| *f == file)?;
        Some(ROOT_INODE + 1 + pos as u64)
    }

    /// Classify an inode number.
    pub fn route_inode(&self, ino: u64) -> Option<Route> {
        if ino == ROOT_INODE {
            return Some(Route::Root);
        }
        let idx = ino.checked_sub(ROOT_INODE + 1)? as usize;
        self.layout.files().get(idx).copied().map(Route::Channel)
    }

    /// Root directory entries in fixed order: `(inode, file, name)`.
    pub fn entries(&self) -> Vec<(u64, VirtualFile, String)> {
        self.layout
            .files()
            .into_iter()
            .enumerate()
            .map(|(i, f)| (ROOT_INODE + 1 + i as u64, f, self.layout.file_name(f)))
            .collect()
    }

    fn file_by_name(&self, name: &str) -> Option<VirtualFile> {
        self.layout
            .files()
            .into_iter()
            .find(|f| self.layout.file_name(*f) == name)
    }
}
