//! Owned snapshot of a `stat`/`fstat`/`lstat` result.
//!
//! `eio.c` hands back a raw `EIO_STRUCT_STAT *` the host reads directly out
//! of the request. The safe-Rust equivalent is an owned value carried home
//! in [`crate::Payload::Stat`] rather than a pointer into worker-owned
//! scratch memory.
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileStat {
    pub dev: u64,
    pub ino: u64,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u64,
    pub size: u64,
    pub blksize: i64,
    pub blocks: i64,
    pub atime: Option<SystemTime>,
    pub mtime: Option<SystemTime>,
    pub ctime: Option<SystemTime>,
    pub is_dir: bool,
    pub is_file: bool,
    pub is_symlink: bool,
}

impl FileStat {
    #[cfg(unix)]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            dev: meta.dev(),
            ino: meta.ino(),
            mode: meta.mode(),
            nlink: meta.nlink(),
            uid: meta.uid(),
            gid: meta.gid(),
            rdev: meta.rdev(),
            size: meta.size(),
            blksize: meta.blksize() as i64,
            blocks: meta.blocks() as i64,
            atime: meta.accessed().ok(),
            mtime: meta.modified().ok(),
            ctime: meta.created().ok(),
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            is_symlink: meta.file_type().is_symlink(),
        }
    }

    #[cfg(not(unix))]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        Self {
            dev: 0,
            ino: 0,
            mode: 0,
            nlink: 1,
            uid: 0,
            gid: 0,
            rdev: 0,
            size: meta.len(),
            blksize: 0,
            blocks: 0,
            atime: meta.accessed().ok(),
            mtime: meta.modified().ok(),
            ctime: meta.created().ok(),
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            is_symlink: meta.file_type().is_symlink(),
        }
    }
}
