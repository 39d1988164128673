//! Virtual files and their shared-memory backing storage.
//!
//! A *channel* is a virtual file together with the real file on
//! shared-memory storage that holds its bytes. The channel set is fixed at
//! mount configuration time; callers can never create, rename, or delete
//! entries.

mod backing;
mod registry;

pub use backing::BackingChannel;
pub use registry::ChannelRegistry;

/// Identity of one synthetic file in the mounted namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualFile {
    /// The writable command channel; flushing it drives the offload trigger.
    Command,
    /// A result channel, indexed from zero.
    Result(u8),
}

/// The two supported channel configurations.
///
/// The driver started with a single `result` file and later grew three
/// indexed result files; both shapes remain valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    /// `command` + `result`.
    Single,
    /// `command` + `res0`, `res1`, `res2`.
    #[default]
    Triple,
}

impl ChannelLayout {
    /// Number of result channels in this layout.
    pub fn result_count(&self) -> u8 {
        match self {
            ChannelLayout::Single => 1,
            ChannelLayout::Triple => 3,
        }
    }

    /// All virtual files, in directory-listing order (command first).
    pub fn files(&self) -> Vec<VirtualFile> {
        let mut files = vec![VirtualFile::Command];
        files.extend((0..self.result_count()).map(VirtualFile::Result));
        files
    }

    /// Whether `file` is part of this layout.
    pub fn contains(&self, file: VirtualFile) -> bool {
        match file {
            VirtualFile::Command => true,
            VirtualFile::Result(i) => i < self.result_count(),
        }
    }

    /// Name the virtual file appears under in the mount root.
    pub fn file_name(&self, file: VirtualFile) -> String {
        match (self, file) {
            (_, VirtualFile::Command) => "command".to_string(),
            (ChannelLayout::Single, VirtualFile::Result(_)) => "result".to_string(),
            (ChannelLayout::Triple, VirtualFile::Result(i)) => format!("res{}", i),
        }
    }

    /// Name of the backing file under the shared-memory directory.
    ///
    /// These names are part of the contract with the worker process, which
    /// reads the command path and writes the result path(s) directly.
    pub fn backing_name(&self, file: VirtualFile) -> String {
        match (self, file) {
            (_, VirtualFile::Command) => "pushdown_command".to_string(),
            (ChannelLayout::Single, VirtualFile::Result(_)) => "pushdown_res".to_string(),
            (ChannelLayout::Triple, VirtualFile::Result(i)) => format!("pushdown_res{}", i),
        }
    }

    /// Mode bits reported for the virtual file.
    ///
    /// `None` means the backing file's own mode is reported, which makes
    /// result attributes mutable in the triple layout. The command channel
    /// is always world read/write; mode bits carry no access-control weight
    /// beyond what the kernel applies.
    pub fn reported_mode(&self, file: VirtualFile) -> Option<u16> {
        match (self, file) {
            (_, VirtualFile::Command) => Some(0o666),
            (ChannelLayout::Single, VirtualFile::Result(_)) => Some(0o444),
            (ChannelLayout::Triple, VirtualFile::Result(_)) => None,
        }
    }
}
