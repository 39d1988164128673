//! fuser callback table routing operations onto the channel registry.
//!
//! Every operation is implemented once, generically over "the channel
//! selected by route". The core bodies are plain `Result`-returning methods
//! so they can be exercised without a kernel mount; the `Filesystem` impl
//! is a thin shim mapping results onto fuser replies.

use crate::channel::{BackingChannel, ChannelRegistry, VirtualFile};
use crate::offload::OffloadTrigger;
use crate::router::{PathRouter, Route, ROOT_INODE};
use fuser::{
    FileAttr, FileType, Filesystem, KernelConfig, ReplyAttr, ReplyData, ReplyDirectory,
    ReplyEmpty, ReplyEntry, ReplyOpen, ReplyWrite, ReplyXattr, Request, TimeOrNow,
};
use libc::{EINVAL, EIO, EISDIR, ENOENT, ENOTDIR, ENOTSUP, EPERM, ERANGE};
use std::ffi::OsStr;
use std::fs::Metadata;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info};

/// Zero TTL keeps the kernel from caching entries and attributes, so every
/// query is answered from the backing descriptors.
const TTL: Duration = Duration::ZERO;

type OpResult<T> = Result<T, i32>;

/// The pushdown channel filesystem.
///
/// Descriptor model: all operations go through the shared registry
/// descriptor with explicit positioned I/O. Open handles carry no state of
/// their own, so command and result content is identical across every
/// concurrently open handle.
pub struct PushdownFS {
    registry: ChannelRegistry,
    router: PathRouter,
    trigger: OffloadTrigger,
    /// Root directory ownership mirrors the mounting process.
    uid: u32,
    gid: u32,
}

impl PushdownFS {
    pub fn new(registry: ChannelRegistry, trigger: OffloadTrigger) -> Self {
        let router = PathRouter::new(registry.layout());
        let uid = unsafe { libc::getuid() };
        let gid = unsafe { libc::getgid() };
        Self {
            registry,
            router,
            trigger,
            uid,
            gid,
        }
    }

    fn channel_for(&self, ino: u64) -> OpResult<(VirtualFile, &BackingChannel)> {
        match self.router.route_inode(ino) {
            Some(Route::Channel(file)) => {
                let channel = self.registry.channel(file).ok_or(ENOENT)?;
                Ok((file, channel))
            }
            Some(Route::Root) => Err(EISDIR),
            None => Err(ENOENT),
        }
    }

    fn root_attr(&self) -> FileAttr {
        let now = SystemTime::now();
        FileAttr {
            ino: ROOT_INODE,
            size: 0,
            blocks: 0,
            atime: now,
            mtime: now,
            ctime: now,
            crtime: now,
            kind: FileType::Directory,
            perm: 0o755,
            nlink: 2,
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: 512,
            flags: 0,
        }
    }

    /// Attributes of a channel, proxied from its backing descriptor with the
    /// layout's mode override applied.
    fn channel_attr(&self, ino: u64, file: VirtualFile, meta: &Metadata) -> FileAttr {
        let perm = self
            .registry
            .layout()
            .reported_mode(file)
            .unwrap_or((meta.mode() & 0o7777) as u16);

        let mtime = meta.modified().unwrap_or(UNIX_EPOCH);
        let atime = meta.accessed().unwrap_or(UNIX_EPOCH);
        let ctime = UNIX_EPOCH + Duration::from_secs(meta.ctime().max(0) as u64);

        FileAttr {
            ino,
            size: meta.len(),
            blocks: meta.blocks(),
            atime,
            mtime,
            ctime,
            crtime: mtime,
            kind: FileType::RegularFile,
            perm,
            nlink: 1,
            uid: meta.uid(),
            gid: meta.gid(),
            rdev: 0,
            blksize: meta.blksize() as u32,
            flags: 0,
        }
    }

    fn do_getattr(&self, ino: u64) -> OpResult<FileAttr> {
        match self.router.route_inode(ino) {
            Some(Route::Root) => Ok(self.root_attr()),
            Some(Route::Channel(file)) => {
                let channel = self.registry.channel(file).ok_or(ENOENT)?;
                let meta = channel.metadata().map_err(errno)?;
                Ok(self.channel_attr(ino, file, &meta))
            }
            None => Err(ENOENT),
        }
    }

    fn do_lookup(&self, parent: u64, name: &OsStr) -> OpResult<FileAttr> {
        if parent != ROOT_INODE {
            // The namespace is flat; nothing nests below the channels.
            return Err(ENOENT);
        }
        let file = self.router.route_name(name).ok_or(ENOENT)?;
        let ino = self.router.inode(file).ok_or(ENOENT)?;
        self.do_getattr(ino)
    }

    #[allow(clippy::too_many_arguments)]
    fn do_setattr(
        &self,
        ino: u64,
        mode: Option<u32>,
        uid: Option<u32>,
        gid: Option<u32>,
        size: Option<u64>,
        atime: Option<TimeOrNow>,
        mtime: Option<TimeOrNow>,
    ) -> OpResult<FileAttr> {
        let (_, channel) = match self.channel_for(ino) {
            Ok(pair) => pair,
            // The synthetic root has no mutable attributes.
            Err(EISDIR) => return Err(EPERM),
            Err(e) => return Err(e),
        };

        if let Some(mode) = mode {
            channel.set_mode(mode & 0o7777).map_err(errno)?;
        }
        if uid.is_some() || gid.is_some() {
            channel.set_owner(uid, gid).map_err(errno)?;
        }
        if let Some(size) = size {
            channel.set_size(size).map_err(errno)?;
        }
        if atime.is_some() || mtime.is_some() {
            channel
                .set_times(atime.map(resolve_time), mtime.map(resolve_time))
                .map_err(errno)?;
        }

        self.do_getattr(ino)
    }

    fn do_open(&self, ino: u64) -> OpResult<()> {
        match self.router.route_inode(ino) {
            Some(Route::Channel(_)) => Ok(()),
            Some(Route::Root) => Err(EISDIR),
            None => Err(ENOENT),
        }
    }

    fn do_read(&self, ino: u64, offset: i64, size: u32) -> OpResult<Vec<u8>> {
        let (_, channel) = self.channel_for(ino)?;
        let offset = u64::try_from(offset).map_err(|_| EINVAL)?;
        channel.read_at(size as usize, offset).map_err(errno)
    }

    fn do_write(&self, ino: u64, offset: i64, data: &[u8]) -> OpResult<u32> {
        let (_, channel) = self.channel_for(ino)?;
        let offset = u64::try_from(offset).map_err(|_| EINVAL)?;
        let written = channel.write_at(data, offset).map_err(errno)?;
        Ok(written as u32)
    }

    /// Shared body of `flush` and `fsync`: only the command channel can arm
    /// the offload trigger; result-channel flushes are no-op successes.
    fn do_flush(&self, ino: u64) -> OpResult<()> {
        let (file, channel) = self.channel_for(ino)?;
        match file {
            VirtualFile::Command => self.trigger.flush(channel).map_err(|e| {
                error!("offload failed: {}", e);
                e.errno()
            }),
            VirtualFile::Result(_) => Ok(()),
        }
    }

    /// fsync is defined to behave exactly like flush: it can (re)trigger
    /// offload while command data is present, and is a no-op success on
    /// result channels.
    fn do_fsync(&self, ino: u64) -> OpResult<()> {
        self.do_flush(ino)
    }

    fn do_readdir(&self, ino: u64) -> OpResult<Vec<(u64, FileType, String)>> {
        match self.router.route_inode(ino) {
            Some(Route::Root) => {
                let mut entries = vec![
                    (ROOT_INODE, FileType::Directory, ".".to_string()),
                    (ROOT_INODE, FileType::Directory, "..".to_string()),
                ];
                entries.extend(
                    self.router
                        .entries()
                        .into_iter()
                        .map(|(ino, _, name)| (ino, FileType::RegularFile, name)),
                );
                Ok(entries)
            }
            Some(Route::Channel(_)) => Err(ENOTDIR),
            None => Err(ENOENT),
        }
    }

    fn do_getxattr(&self, ino: u64, name: &OsStr) -> OpResult<Vec<u8>> {
        let (_, channel) = self.xattr_channel(ino)?;
        channel.get_xattr(name).map_err(errno)
    }

    fn do_setxattr(&self, ino: u64, name: &OsStr, value: &[u8], flags: i32) -> OpResult<()> {
        let (_, channel) = self.xattr_channel(ino)?;
        channel.set_xattr(name, value, flags).map_err(errno)
    }

    fn do_listxattr(&self, ino: u64) -> OpResult<Vec<u8>> {
        let (_, channel) = self.xattr_channel(ino)?;
        channel.list_xattr().map_err(errno)
    }

    fn do_removexattr(&self, ino: u64, name: &OsStr) -> OpResult<()> {
        let (_, channel) = self.xattr_channel(ino)?;
        channel.remove_xattr(name).map_err(errno)
    }

    fn xattr_channel(&self, ino: u64) -> OpResult<(VirtualFile, &BackingChannel)> {
        match self.channel_for(ino) {
            // The synthetic root has no backing file to hold xattrs.
            Err(EISDIR) => Err(ENOTSUP),
            other => other,
        }
    }
}

fn errno(err: io::Error) -> i32 {
    err.raw_os_error().unwrap_or(EIO)
}

fn resolve_time(t: TimeOrNow) -> SystemTime {
    match t {
        TimeOrNow::SpecificTime(t) => t,
        TimeOrNow::Now => SystemTime::now(),
    }
}

impl Filesystem for PushdownFS {
    fn init(&mut self, _req: &Request<'_>, _config: &mut KernelConfig) -> Result<(), libc::c_int> {
        info!(layout = ?self.registry.layout(), "pushdownfs session started");
        Ok(())
    }

    fn destroy(&mut self) {
        // Called once per mount; the registry (and every backing
        // descriptor) drops with the filesystem after the session ends.
        info!("pushdownfs session ended; releasing channel registry");
    }

    fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
        debug!("lookup: parent={}, name={:?}", parent, name);
        match self.do_lookup(parent, name) {
            Ok(attr) => reply.entry(&TTL, &attr, 0),
            Err(e) => reply.error(e),
        }
    }

    fn getattr(&mut self, _req: &Request, ino: u64, reply: ReplyAttr) {
        debug!("getattr: ino={}", ino);
        match self.do_getattr(ino) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(e) => reply.error(e),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn setattr(
        &mut self,
        _req: &Request,
        ino: u64,
        mode: Option<u32>,
        uid: Option<u32>,
        gid: Option<u32>,
        size: Option<u64>,
        atime: Option<TimeOrNow>,
        mtime: Option<TimeOrNow>,
        _ctime: Option<SystemTime>,
        _fh: Option<u64>,
        _crtime: Option<SystemTime>,
        _chgtime: Option<SystemTime>,
        _bkuptime: Option<SystemTime>,
        _flags: Option<u32>,
        reply: ReplyAttr,
    ) {
        debug!("setattr: ino={}, mode={:?}, size={:?}", ino, mode, size);
        match self.do_setattr(ino, mode, uid, gid, size, atime, mtime) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(e) => reply.error(e),
        }
    }

    fn open(&mut self, _req: &Request, ino: u64, _flags: i32, reply: ReplyOpen) {
        debug!("open: ino={}", ino);
        match self.do_open(ino) {
            // Handles share the registry descriptor; nothing per-handle to
            // track.
            Ok(()) => reply.opened(0, 0),
            Err(e) => reply.error(e),
        }
    }

    fn read(
        &mut self,
        _req: &Request,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock: Option<u64>,
        reply: ReplyData,
    ) {
        debug!("read: ino={}, offset={}, size={}", ino, offset, size);
        match self.do_read(ino, offset, size) {
            Ok(data) => reply.data(&data),
            Err(e) => reply.error(e),
        }
    }

    fn write(
        &mut self,
        _req: &Request,
        ino: u64,
        _fh: u64,
        offset: i64,
        data: &[u8],
        _write_flags: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        debug!("write: ino={}, offset={}, len={}", ino, offset, data.len());
        match self.do_write(ino, offset, data) {
            Ok(written) => reply.written(written),
            Err(e) => reply.error(e),
        }
    }

    fn flush(&mut self, _req: &Request, ino: u64, _fh: u64, _lock_owner: u64, reply: ReplyEmpty) {
        debug!("flush: ino={}", ino);
        match self.do_flush(ino) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(e),
        }
    }

    fn release(
        &mut self,
        _req: &Request,
        ino: u64,
        _fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        debug!("release: ino={}", ino);
        // The registry descriptor outlives every handle.
        reply.ok();
    }

    fn fsync(&mut self, _req: &Request, ino: u64, _fh: u64, _datasync: bool, reply: ReplyEmpty) {
        debug!("fsync: ino={}", ino);
        match self.do_fsync(ino) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(e),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        debug!("readdir: ino={}, offset={}", ino, offset);
        match self.do_readdir(ino) {
            Ok(entries) => {
                for (i, (ino, kind, name)) in
                    entries.into_iter().enumerate().skip(offset as usize)
                {
                    // reply.add returns true when the buffer is full.
                    if reply.add(ino, (i + 1) as i64, kind, &name) {
                        break;
                    }
                }
                reply.ok();
            }
            Err(e) => reply.error(e),
        }
    }

    fn setxattr(
        &mut self,
        _req: &Request,
        ino: u64,
        name: &OsStr,
        value: &[u8],
        flags: i32,
        _position: u32,
        reply: ReplyEmpty,
    ) {
        debug!("setxattr: ino={}, name={:?}", ino, name);
        match self.do_setxattr(ino, name, value, flags) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(e),
        }
    }

    fn getxattr(
        &mut self,
        _req: &Request,
        ino: u64,
        name: &OsStr,
        size: u32,
        reply: ReplyXattr,
    ) {
        debug!("getxattr: ino={}, name={:?}, size={}", ino, name, size);
        match self.do_getxattr(ino, name) {
            Ok(value) => reply_xattr(value, size, reply),
            Err(e) => reply.error(e),
        }
    }

    fn listxattr(&mut self, _req: &Request, ino: u64, size: u32, reply: ReplyXattr) {
        debug!("listxattr: ino={}, size={}", ino, size);
        match self.do_listxattr(ino) {
            Ok(list) => reply_xattr(list, size, reply),
            Err(e) => reply.error(e),
        }
    }

    fn removexattr(&mut self, _req: &Request, ino: u64, name: &OsStr, reply: ReplyEmpty) {
        debug!("removexattr: ino={}, name={:?}", ino, name);
        match self.do_removexattr(ino, name) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(e),
        }
    }
}

/// The xattr two-phase protocol: a zero `size` asks for the value length,
/// otherwise the value must fit in `size` bytes.
fn reply_xattr(value: Vec<u8>, size: u32, reply: ReplyXattr) {
    if size == 0 {
        reply.size(value.len() as u32);
    } else if value.len() <= size as usize {
        reply.data(&value);
    } else {
        reply.error(ERANGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelLayout;
    use crate::config::Settings;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn test_fs(layout: ChannelLayout, worker: &str) -> (TempDir, PushdownFS) {
        let dir = tempdir().unwrap();
        let settings = Settings {
            backing_dir: dir.path().to_path_buf(),
            layout,
            worker: PathBuf::from(worker),
        };
        let registry = ChannelRegistry::open(&settings).unwrap();
        let trigger = OffloadTrigger::new(settings.worker, registry.backing_paths());
        (dir, PushdownFS::new(registry, trigger))
    }

    fn command_ino(fs: &PushdownFS) -> u64 {
        fs.router.inode(VirtualFile::Command).unwrap()
    }

    #[test]
    fn test_getattr_root_is_directory() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let attr = fs.do_getattr(ROOT_INODE).unwrap();
        assert_eq!(attr.kind, FileType::Directory);
        assert_eq!(attr.perm, 0o755);
    }

    #[test]
    fn test_lookup_command_reports_world_writable() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let attr = fs.do_lookup(ROOT_INODE, OsStr::new("command")).unwrap();
        assert_eq!(attr.kind, FileType::RegularFile);
        assert_eq!(attr.perm, 0o666);
        assert_eq!(attr.size, 0);
    }

    #[test]
    fn test_lookup_result_read_only_in_single_layout() {
        let (_dir, fs) = test_fs(ChannelLayout::Single, "/bin/true");
        let attr = fs.do_lookup(ROOT_INODE, OsStr::new("result")).unwrap();
        assert_eq!(attr.perm, 0o444);
    }

    #[test]
    fn test_lookup_unknown_name_is_enoent() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        assert!(matches!(
            fs.do_lookup(ROOT_INODE, OsStr::new("nonexistent")),
            Err(ENOENT)
        ));
    }

    #[test]
    fn test_lookup_below_channel_is_enoent() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let ino = command_ino(&fs);
        assert!(matches!(
            fs.do_lookup(ino, OsStr::new("anything")),
            Err(ENOENT)
        ));
    }

    #[test]
    fn test_write_then_read_same_offset_range() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let ino = command_ino(&fs);

        assert_eq!(fs.do_write(ino, 0, b"job-42").unwrap(), 6);
        assert_eq!(fs.do_read(ino, 0, 6).unwrap(), b"job-42");

        assert_eq!(fs.do_write(ino, 64, b"tail").unwrap(), 4);
        assert_eq!(fs.do_read(ino, 64, 4).unwrap(), b"tail");
    }

    #[test]
    fn test_negative_offset_is_einval() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let ino = command_ino(&fs);
        assert_eq!(fs.do_read(ino, -1, 4), Err(EINVAL));
        assert_eq!(fs.do_write(ino, -1, b"x"), Err(EINVAL));
    }

    #[test]
    fn test_readdir_lists_configured_set() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let names: Vec<String> = fs
            .do_readdir(ROOT_INODE)
            .unwrap()
            .into_iter()
            .map(|(_, _, name)| name)
            .collect();
        assert_eq!(names, vec![".", "..", "command", "res0", "res1", "res2"]);
    }

    #[test]
    fn test_readdir_stable_after_io() {
        let (_dir, fs) = test_fs(ChannelLayout::Single, "/bin/true");
        let before = fs.do_readdir(ROOT_INODE).unwrap();

        let ino = command_ino(&fs);
        fs.do_write(ino, 0, b"payload").unwrap();
        fs.do_flush(ino).unwrap();

        assert_eq!(fs.do_readdir(ROOT_INODE).unwrap(), before);
    }

    #[test]
    fn test_readdir_on_channel_is_enotdir() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        assert_eq!(fs.do_readdir(command_ino(&fs)), Err(ENOTDIR));
    }

    #[test]
    fn test_unknown_inode_fails_everywhere() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let bogus = 99;
        assert!(matches!(fs.do_getattr(bogus), Err(ENOENT)));
        assert_eq!(fs.do_open(bogus), Err(ENOENT));
        assert_eq!(fs.do_read(bogus, 0, 4), Err(ENOENT));
        assert_eq!(fs.do_write(bogus, 0, b"x"), Err(ENOENT));
        assert_eq!(fs.do_flush(bogus), Err(ENOENT));
        assert_eq!(fs.do_readdir(bogus), Err(ENOENT));
    }

    #[test]
    fn test_flush_empty_command_succeeds_without_spawn() {
        // A /bin/false worker would fail any flush that dispatched it.
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/false");
        assert_eq!(fs.do_flush(command_ino(&fs)), Ok(()));
    }

    #[test]
    fn test_flush_nonempty_command_failure_is_eio() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/false");
        let ino = command_ino(&fs);
        fs.do_write(ino, 0, b"abc").unwrap();

        assert_eq!(fs.do_flush(ino), Err(EIO));
        // The backing content is left exactly as written.
        assert_eq!(fs.do_read(ino, 0, 16).unwrap(), b"abc");
    }

    #[test]
    fn test_flush_nonempty_command_success() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let ino = command_ino(&fs);
        fs.do_write(ino, 0, b"abc").unwrap();
        assert_eq!(fs.do_flush(ino), Ok(()));
        // Triggering does not clear the command file.
        assert_eq!(fs.do_read(ino, 0, 16).unwrap(), b"abc");
    }

    #[test]
    fn test_flush_result_channel_never_spawns() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/false");
        let command = command_ino(&fs);
        fs.do_write(command, 0, b"armed").unwrap();

        for i in 0..3 {
            let ino = fs.router.inode(VirtualFile::Result(i)).unwrap();
            assert_eq!(fs.do_flush(ino), Ok(()));
        }
    }

    #[test]
    fn test_fsync_triggers_offload_like_flush() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/false");
        let ino = command_ino(&fs);

        // Empty command: fsync succeeds without dispatching.
        assert_eq!(fs.do_fsync(ino), Ok(()));

        // Armed command: fsync dispatches, and a failing worker fails it.
        fs.do_write(ino, 0, b"abc").unwrap();
        assert_eq!(fs.do_fsync(ino), Err(EIO));
        // The command stays armed, so a second fsync dispatches again.
        assert_eq!(fs.do_fsync(ino), Err(EIO));

        // Result channels: fsync is a no-op success.
        let res0 = fs.router.inode(VirtualFile::Result(0)).unwrap();
        assert_eq!(fs.do_fsync(res0), Ok(()));
    }

    #[test]
    fn test_setattr_truncates_command() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let ino = command_ino(&fs);
        fs.do_write(ino, 0, b"abcdef").unwrap();

        let attr = fs
            .do_setattr(ino, None, None, None, Some(2), None, None)
            .unwrap();
        assert_eq!(attr.size, 2);
        assert_eq!(fs.do_read(ino, 0, 16).unwrap(), b"ab");
    }

    #[test]
    fn test_setattr_mode_visible_in_triple_results() {
        // Triple-layout result channels report the backing mode, so a
        // chmod must round-trip through getattr.
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        let ino = fs.router.inode(VirtualFile::Result(1)).unwrap();

        let attr = fs
            .do_setattr(ino, Some(0o640), None, None, None, None, None)
            .unwrap();
        assert_eq!(attr.perm, 0o640);
        assert_eq!(fs.do_getattr(ino).unwrap().perm, 0o640);
    }

    #[test]
    fn test_setattr_mode_masked_by_single_result_override() {
        // The single layout pins the reported result mode at 0444 even
        // though the backing file mode changes underneath.
        let (_dir, fs) = test_fs(ChannelLayout::Single, "/bin/true");
        let ino = fs.router.inode(VirtualFile::Result(0)).unwrap();

        let attr = fs
            .do_setattr(ino, Some(0o600), None, None, None, None, None)
            .unwrap();
        assert_eq!(attr.perm, 0o444);
    }

    #[test]
    fn test_setattr_on_root_is_eperm() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        assert!(matches!(
            fs.do_setattr(ROOT_INODE, Some(0o700), None, None, None, None, None),
            Err(EPERM)
        ));
    }

    #[test]
    fn test_open_root_is_eisdir() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        assert_eq!(fs.do_open(ROOT_INODE), Err(EISDIR));
        assert_eq!(fs.do_open(command_ino(&fs)), Ok(()));
    }

    #[test]
    fn test_xattr_on_root_is_enotsup() {
        let (_dir, fs) = test_fs(ChannelLayout::Triple, "/bin/true");
        assert_eq!(
            fs.do_getxattr(ROOT_INODE, OsStr::new("user.test")),
            Err(ENOTSUP)
        );
    }
}
