//! One open descriptor on a shared-memory backing file.

use std::ffi::{CString, OsStr};
use std::fs::{File, Metadata, OpenOptions, Permissions};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{FileExt, OpenOptionsExt, PermissionsExt};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A named virtual file bound to one open backing descriptor.
///
/// The descriptor is opened once when the registry is built and stays open
/// until unmount, independent of how often callers open and close the
/// virtual file. All I/O is explicitly positioned, so concurrent requests at
/// different offsets never share cursor state.
///
/// Every operation delegates 1:1 to the descriptor's equivalent primitive
/// and surfaces the originating OS error unchanged.
pub struct BackingChannel {
    name: String,
    path: PathBuf,
    file: File,
}

impl BackingChannel {
    /// Create (or truncate) the backing file and open the long-lived
    /// descriptor on it.
    pub fn create(name: impl Into<String>, path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o666)
            .open(&path)?;
        Ok(Self {
            name: name.into(),
            path,
            file,
        })
    }

    /// Virtual name of the channel (e.g. `command`, `res0`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing file; part of the worker's interface contract.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the backing file in bytes.
    pub fn size(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Attribute snapshot of the backing file.
    pub fn metadata(&self) -> io::Result<Metadata> {
        self.file.metadata()
    }

    /// Positioned read; returns the bytes available at `offset`, which may
    /// be fewer than `size` at end of file.
    pub fn read_at(&self, size: usize, offset: u64) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; size];
        let n = self.file.read_at(&mut buf, offset)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Positioned write; returns the byte count transferred.
    pub fn write_at(&self, data: &[u8], offset: u64) -> io::Result<usize> {
        self.file.write_at(data, offset)
    }

    /// Resize (truncate or extend) the backing file.
    pub fn set_size(&self, size: u64) -> io::Result<()> {
        self.file.set_len(size)
    }

    /// Change the backing file's mode bits.
    pub fn set_mode(&self, mode: u32) -> io::Result<()> {
        self.file.set_permissions(Permissions::from_mode(mode))
    }

    /// Change owner and/or group; `None` leaves the field untouched.
    pub fn set_owner(&self, uid: Option<u32>, gid: Option<u32>) -> io::Result<()> {
        // (uid_t)-1 is the "no change" sentinel for fchown.
        let uid = uid.unwrap_or(u32::MAX);
        let gid = gid.unwrap_or(u32::MAX);
        check_ret(unsafe { libc::fchown(self.file.as_raw_fd(), uid, gid) })
    }

    /// Update access and modification times; `None` leaves a field untouched.
    pub fn set_times(
        &self,
        atime: Option<SystemTime>,
        mtime: Option<SystemTime>,
    ) -> io::Result<()> {
        let times = [to_timespec(atime), to_timespec(mtime)];
        check_ret(unsafe { libc::futimens(self.file.as_raw_fd(), times.as_ptr()) })
    }

    /// Read an extended attribute of the backing file.
    pub fn get_xattr(&self, name: &OsStr) -> io::Result<Vec<u8>> {
        let cname = xattr_name(name)?;
        let fd = self.file.as_raw_fd();
        let len = check_len(unsafe {
            libc::fgetxattr(fd, cname.as_ptr(), std::ptr::null_mut(), 0)
        })?;
        let mut buf = vec![0u8; len];
        let n = check_len(unsafe {
            libc::fgetxattr(fd, cname.as_ptr(), buf.as_mut_ptr().cast(), buf.len())
        })?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Set an extended attribute on the backing file.
    pub fn set_xattr(&self, name: &OsStr, value: &[u8], flags: i32) -> io::Result<()> {
        let cname = xattr_name(name)?;
        check_ret(unsafe {
            libc::fsetxattr(
                self.file.as_raw_fd(),
                cname.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
                flags,
            )
        })
    }

    /// List extended attribute names as the raw NUL-separated buffer.
    pub fn list_xattr(&self) -> io::Result<Vec<u8>> {
        let fd = self.file.as_raw_fd();
        let len = check_len(unsafe { libc::flistxattr(fd, std::ptr::null_mut(), 0) })?;
        let mut buf = vec![0u8; len];
        let n = check_len(unsafe {
            libc::flistxattr(fd, buf.as_mut_ptr().cast(), buf.len())
        })?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Remove an extended attribute from the backing file.
    pub fn remove_xattr(&self, name: &OsStr) -> io::Result<()> {
        let cname = xattr_name(name)?;
        check_ret(unsafe { libc::fremovexattr(self.file.as_raw_fd(), cname.as_ptr()) })
    }
}

fn xattr_name(name: &OsStr) -> io::Result<CString> {
    CString::new(name.as_bytes()).map_err(|_| io::Error::from_raw_os_error(libc::EINVAL))
}

fn check_ret(rc: libc::c_int) -> io::Result<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

fn check_len(rc: libc::ssize_t) -> io::Result<usize> {
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(rc as usize)
    }
}

fn to_timespec(t: Option<SystemTime>) -> libc::timespec {
    match t {
        None => libc::timespec {
            tv_sec: 0,
            tv_nsec: libc::UTIME_OMIT,
        },
        Some(t) => {
            let d = t
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default();
            libc::timespec {
                tv_sec: d.as_secs() as libc::time_t,
                tv_nsec: d.subsec_nanos() as libc::c_long,
            }
        }
    }
}
