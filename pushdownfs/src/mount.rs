//! Mount entry point: registry bootstrap plus the blocking FUSE session.

use crate::channel::ChannelRegistry;
use crate::config::Settings;
use crate::error::MountError;
use crate::fuse::PushdownFS;
use crate::offload::OffloadTrigger;
use fuser::MountOption;
use std::path::Path;
use tracing::info;

/// Mount the channel filesystem at `mountpoint` and block until unmounted
/// (e.g. via Ctrl+C or `fusermount -u`).
///
/// All mount state is built before control is handed to the kernel: any
/// backing-file failure aborts here and a partial mount is never exposed.
pub fn mount_blocking(settings: &Settings, mountpoint: &Path) -> Result<(), MountError> {
    if !mountpoint.is_dir() {
        return Err(MountError::MountpointMissing(mountpoint.to_path_buf()));
    }
    // An unset worker would otherwise only surface as EIO on the first
    // non-empty flush; reject it before exposing the mount.
    if settings.worker.as_os_str().is_empty() {
        return Err(MountError::WorkerUnset);
    }

    let registry = ChannelRegistry::open(settings)?;
    let trigger = OffloadTrigger::new(settings.worker.clone(), registry.backing_paths());

    info!(
        mountpoint = %mountpoint.display(),
        worker = %trigger.program().display(),
        "mounting pushdownfs"
    );
    let fs = PushdownFS::new(registry, trigger);
    let options = [
        MountOption::FSName("pushdownfs".to_string()),
        MountOption::AutoUnmount,
    ];
    fuser::mount2(fs, mountpoint, &options)?;
    Ok(())
}
