use std::fs;
use std::os::unix::fs::{FileTypeExt, MetadataExt};

use tracing::debug;

/// The resolved type of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryKind {
    /// The filesystem reported no usable type.
    Unknown = 0,

    /// A named pipe.
    Fifo,

    /// A character device.
    CharDevice,

    /// A directory.
    Directory,

    /// A block device.
    BlockDevice,

    /// A regular file.
    Regular,

    /// A symbolic link (only reported when links are not followed).
    Symlink,

    /// A socket.
    Socket,
}

impl EntryKind {
    pub(crate) fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_dir() {
            Self::Directory
        } else if ft.is_file() {
            Self::Regular
        } else if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_fifo() {
            Self::Fifo
        } else if ft.is_char_device() {
            Self::CharDevice
        } else if ft.is_block_device() {
            Self::BlockDevice
        } else if ft.is_socket() {
            Self::Socket
        } else {
            Self::Unknown
        }
    }
}

/// The (device, inode) pair identifying a filesystem object. Two paths with
/// the same identity are the same object, which is what makes cycle and
/// cross-device detection possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Identity {
    pub device: u64,
    pub inode: u64,
}

impl Identity {
    pub(crate) fn of(metadata: &fs::Metadata) -> Self {
        Self {
            device: metadata.dev(),
            inode: metadata.ino(),
        }
    }
}

/// Resolve an entry's kind, and its identity where the walk needs one.
///
/// The cheap `file_type()` hint is trusted only when it unambiguously
/// reports a non-directory, non-unknown type that isn't a symlink being
/// followed. Everything else gets a full metadata query: directories need
/// their identity for the cycle check, unknown hints need the real type,
/// and followed symlinks need the target's type. `None` means the entry
/// could not be stat'ed (dangling link, raced deletion) and must be
/// skipped.
pub(crate) fn classify(
    entry: &fs::DirEntry,
    path: &str,
    follow_symlinks: bool,
) -> Option<(EntryKind, Option<Identity>)> {
    let hint = entry.file_type().ok();

    if let Some(ft) = hint {
        let kind = EntryKind::from_file_type(ft);
        let trustworthy = kind != EntryKind::Directory
            && kind != EntryKind::Unknown
            && !(kind == EntryKind::Symlink && follow_symlinks);
        if trustworthy {
            return Some((kind, None));
        }
    }

    let queried = if follow_symlinks {
        fs::metadata(path)
    } else {
        fs::symlink_metadata(path)
    };

    match queried {
        Ok(metadata) => {
            let kind = EntryKind::from_file_type(metadata.file_type());
            Some((kind, Some(Identity::of(&metadata))))
        }
        Err(e) => {
            debug!(path, error = %e, "skipping entry that cannot be stat'ed");
            None
        }
    }
}
