//! Stat/permission/ownership family — grounded on `eio.c`'s
//! `EIO_STAT`/`EIO_LSTAT`/`EIO_FSTAT`/`EIO_STATVFS`/`EIO_FSTATVFS`/
//! `EIO_TRUNCATE`/`EIO_FTRUNCATE`/`EIO_CHMOD`/`EIO_FCHMOD`/`EIO_CHOWN`/
//! `EIO_FCHOWN` cases.

use crate::result::{fail_errno, fail_last_os_error, ok};
use feio_core::{FileStat, Payload, Request};
use std::any::Any;
use std::os::raw::c_int;

/// Filesystem-capacity snapshot from `statvfs`/`fstatvfs`. Not part of
/// `feio-core`'s built-in `Payload` shapes (it's the only opcode family
/// that needs it), carried home via `Payload::Other`.
#[derive(Debug, Clone, Copy)]
pub struct FsCapacity {
    pub block_size: u64,
    pub fragment_size: u64,
    pub blocks_total: u64,
    pub blocks_free: u64,
    pub blocks_available: u64,
    pub files_total: u64,
    pub files_free: u64,
}

impl FsCapacity {
    /// Downcasts a `Payload::Other` produced by [`statvfs_req`]/
    /// [`fstatvfs_req`] back into a typed value.
    pub fn from_payload(payload: &Payload) -> Option<&FsCapacity> {
        match payload {
            Payload::Other(boxed) => boxed.downcast_ref::<FsCapacity>(),
            _ => None,
        }
    }

    fn from_raw(raw: &libc::statvfs) -> Self {
        Self {
            block_size: raw.f_bsize as u64,
            fragment_size: raw.f_frsize as u64,
            blocks_total: raw.f_blocks as u64,
            blocks_free: raw.f_bfree as u64,
            blocks_available: raw.f_bavail as u64,
            files_total: raw.f_files as u64,
            files_free: raw.f_ffree as u64,
        }
    }
}

pub fn stat_req(req: &mut Request) {
    let Some(path) = req.payload1.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
    else {
        return fail_errno(req, libc::EINVAL);
    };
    match std::fs::metadata(&path) {
        Ok(meta) => {
            req.payload2 = Some(Payload::Stat(FileStat::from_metadata(&meta)));
            ok(req, 0);
        }
        Err(e) => fail_errno(req, e.raw_os_error().unwrap_or(libc::EIO)),
    }
}

pub fn lstat_req(req: &mut Request) {
    let Some(path) = req.payload1.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
    else {
        return fail_errno(req, libc::EINVAL);
    };
    match std::fs::symlink_metadata(&path) {
        Ok(meta) => {
            req.payload2 = Some(Payload::Stat(FileStat::from_metadata(&meta)));
            ok(req, 0);
        }
        Err(e) => fail_errno(req, e.raw_os_error().unwrap_or(libc::EIO)),
    }
}

pub fn fstat_req(req: &mut Request) {
    let fd = req.int1 as c_int;
    let mut raw: libc::stat = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::fstat(fd, &mut raw) };
    if ret < 0 {
        return fail_last_os_error(req);
    }
    req.payload2 = Some(Payload::Stat(file_stat_from_raw(&raw)));
    ok(req, 0);
}

pub fn statvfs_req(req: &mut Request) {
    let Some(path) = req.payload1.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
    else {
        return fail_errno(req, libc::EINVAL);
    };
    let Some(cpath) = crate::path_util::to_cstring(&path) else {
        return fail_errno(req, libc::EINVAL);
    };
    let mut raw: libc::statvfs = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::statvfs(cpath.as_ptr(), &mut raw) };
    if ret < 0 {
        return fail_last_os_error(req);
    }
    let boxed: Box<dyn Any + Send> = Box::new(FsCapacity::from_raw(&raw));
    req.payload2 = Some(Payload::Other(boxed));
    ok(req, 0);
}

pub fn fstatvfs_req(req: &mut Request) {
    let fd = req.int1 as c_int;
    let mut raw: libc::statvfs = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::fstatvfs(fd, &mut raw) };
    if ret < 0 {
        return fail_last_os_error(req);
    }
    let boxed: Box<dyn Any + Send> = Box::new(FsCapacity::from_raw(&raw));
    req.payload2 = Some(Payload::Other(boxed));
    ok(req, 0);
}

pub fn truncate_req(req: &mut Request) {
    let Some(path) = req.payload1.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
    else {
        return fail_errno(req, libc::EINVAL);
    };
    let Some(cpath) = crate::path_util::to_cstring(&path) else {
        return fail_errno(req, libc::EINVAL);
    };
    let ret = unsafe { libc::truncate(cpath.as_ptr(), req.size as libc::off_t) };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

pub fn ftruncate_req(req: &mut Request) {
    let ret = unsafe { libc::ftruncate(req.int1 as c_int, req.size as libc::off_t) };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

pub fn chmod_req(req: &mut Request) {
    let Some(path) = req.payload1.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
    else {
        return fail_errno(req, libc::EINVAL);
    };
    let Some(cpath) = crate::path_util::to_cstring(&path) else {
        return fail_errno(req, libc::EINVAL);
    };
    let ret = unsafe { libc::chmod(cpath.as_ptr(), req.int1 as libc::mode_t) };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

pub fn fchmod_req(req: &mut Request) {
    let ret = unsafe { libc::fchmod(req.int1 as c_int, req.int2 as libc::mode_t) };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

pub fn chown_req(req: &mut Request) {
    let Some(path) = req.payload1.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
    else {
        return fail_errno(req, libc::EINVAL);
    };
    let Some(cpath) = crate::path_util::to_cstring(&path) else {
        return fail_errno(req, libc::EINVAL);
    };
    let ret = unsafe {
        libc::chown(cpath.as_ptr(), req.int1 as libc::uid_t, req.int2 as libc::gid_t)
    };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

pub fn fchown_req(req: &mut Request) {
    let ret = unsafe {
        libc::fchown(req.int1 as c_int, req.int2 as libc::uid_t, req.int3 as libc::gid_t)
    };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

fn file_stat_from_raw(raw: &libc::stat) -> FileStat {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    let to_time = |sec: i64, nsec: i64| {
        if sec >= 0 {
            Some(UNIX_EPOCH + Duration::new(sec as u64, nsec as u32))
        } else {
            None
        }
    };
    FileStat {
        dev: raw.st_dev as u64,
        ino: raw.st_ino as u64,
        mode: raw.st_mode as u32,
        nlink: raw.st_nlink as u64,
        uid: raw.st_uid,
        gid: raw.st_gid,
        rdev: raw.st_rdev as u64,
        size: raw.st_size as u64,
        blksize: raw.st_blksize as i64,
        blocks: raw.st_blocks as i64,
        atime: to_time(raw.st_atime, raw.st_atime_nsec),
        mtime: to_time(raw.st_mtime, raw.st_mtime_nsec),
        ctime: to_time(raw.st_ctime, raw.st_ctime_nsec),
        is_dir: raw.st_mode & libc::S_IFMT == libc::S_IFDIR,
        is_file: raw.st_mode & libc::S_IFMT == libc::S_IFREG,
        is_symlink: raw.st_mode & libc::S_IFMT == libc::S_IFLNK,
    }
}
