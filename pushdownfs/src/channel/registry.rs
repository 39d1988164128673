//! Mount-wide table of open backing descriptors.

use super::{BackingChannel, ChannelLayout, VirtualFile};
use crate::config::Settings;
use crate::error::MountError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Mount-wide table mapping each virtual file to its open backing
/// descriptor.
///
/// Built once during mount initialization and dropped exactly once at
/// unmount teardown. The registry exclusively owns every descriptor; no
/// other component closes them.
pub struct ChannelRegistry {
    layout: ChannelLayout,
    /// Channels in listing order; the command channel is always first.
    channels: Vec<(VirtualFile, BackingChannel)>,
}

impl ChannelRegistry {
    /// Create/truncate every backing file fresh and open its descriptor.
    ///
    /// Any create or open failure is fatal to mounting: a partially
    /// initialized registry is never returned, and the caller is expected
    /// to abort the mount.
    pub fn open(settings: &Settings) -> Result<Self, MountError> {
        let layout = settings.layout;
        let mut channels = Vec::new();
        for file in layout.files() {
            let name = layout.file_name(file);
            let path = settings.backing_dir.join(layout.backing_name(file));
            debug!("opening backing file {:?} for channel {}", path, name);
            let channel = BackingChannel::create(name, path.clone())
                .map_err(|source| MountError::Backing { path, source })?;
            channels.push((file, channel));
        }
        info!(
            "channel registry ready: {} backing descriptors under {:?}",
            channels.len(),
            settings.backing_dir
        );
        Ok(Self { layout, channels })
    }

    /// The channel configuration this registry was built for.
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Backing channel for a virtual file, if it is part of the layout.
    pub fn channel(&self, file: VirtualFile) -> Option<&BackingChannel> {
        self.channels
            .iter()
            .find(|(f, _)| *f == file)
            .map(|(_, c)| c)
    }

    /// The command channel.
    pub fn command(&self) -> &BackingChannel {
        // Listing order puts the command channel first.
        &self.channels[0].1
    }

    /// Backing paths in listing order (command first, then results); this
    /// ordered list is the worker's argument vector.
    pub fn backing_paths(&self) -> Vec<PathBuf> {
        self.channels
            .iter()
            .map(|(_, c)| c.path().to_path_buf())
            .collect()
    }
}

impl Drop for ChannelRegistry {
    fn drop(&mut self) {
        debug!("closing {} backing descriptors", self.channels.len());
    }
}
