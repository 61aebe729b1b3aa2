//! Unlink/mkdir/rename/link family — grounded on `eio.c`'s
//! `EIO_UNLINK`/`EIO_RMDIR`/`EIO_MKDIR`/`EIO_RENAME`/`EIO_LINK`/
//! `EIO_SYMLINK`/`EIO_READLINK`/`EIO_READDIR` cases, supplemented with
//! `EIO_REALPATH` (`SPEC_FULL.md` §10).
//!
//! These go through `std::fs` rather than raw libc: none of them need a
//! fd, and `std::fs` already reports the right `errno` through
//! `io::Error::raw_os_error`.

use crate::result::{fail_errno, from_io};
use feio_core::{Payload, Request};
use std::os::unix::fs::DirBuilderExt;

fn path1(req: &Request) -> Option<std::path::PathBuf> {
    req.payload1.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
}

fn path2(req: &Request) -> Option<std::path::PathBuf> {
    req.payload2.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
}

pub fn unlink_req(req: &mut Request) {
    let Some(path) = path1(req) else {
        return fail_errno(req, libc::EINVAL);
    };
    from_io(req, std::fs::remove_file(&path), |_| 0);
}

pub fn rmdir_req(req: &mut Request) {
    let Some(path) = path1(req) else {
        return fail_errno(req, libc::EINVAL);
    };
    from_io(req, std::fs::remove_dir(&path), |_| 0);
}

/// `int1` carries the creation mode.
pub fn mkdir_req(req: &mut Request) {
    let Some(path) = path1(req) else {
        return fail_errno(req, libc::EINVAL);
    };
    let result = std::fs::DirBuilder::new().mode(req.int1 as u32).create(&path);
    from_io(req, result, |_| 0);
}

pub fn rename_req(req: &mut Request) {
    let (Some(from), Some(to)) = (path1(req), path2(req)) else {
        return fail_errno(req, libc::EINVAL);
    };
    from_io(req, std::fs::rename(&from, &to), |_| 0);
}

pub fn link_req(req: &mut Request) {
    let (Some(from), Some(to)) = (path1(req), path2(req)) else {
        return fail_errno(req, libc::EINVAL);
    };
    from_io(req, std::fs::hard_link(&from, &to), |_| 0);
}

pub fn symlink_req(req: &mut Request) {
    let (Some(target), Some(link)) = (path1(req), path2(req)) else {
        return fail_errno(req, libc::EINVAL);
    };
    from_io(req, std::os::unix::fs::symlink(&target, &link), |_| 0);
}

pub fn readlink_req(req: &mut Request) {
    let Some(path) = path1(req) else {
        return fail_errno(req, libc::EINVAL);
    };
    match std::fs::read_link(&path) {
        Ok(target) => {
            req.payload2 = Some(Payload::Path(target));
            req.result = 0;
            req.errorno = None;
        }
        Err(e) => fail_errno(req, e.raw_os_error().unwrap_or(libc::EIO)),
    }
}

pub fn realpath_req(req: &mut Request) {
    let Some(path) = path1(req) else {
        return fail_errno(req, libc::EINVAL);
    };
    match std::fs::canonicalize(&path) {
        Ok(resolved) => {
            req.payload2 = Some(Payload::Path(resolved));
            req.result = 0;
            req.errorno = None;
        }
        Err(e) => fail_errno(req, e.raw_os_error().unwrap_or(libc::EIO)),
    }
}

pub fn readdir_req(req: &mut Request) {
    let Some(path) = path1(req) else {
        return fail_errno(req, libc::EINVAL);
    };
    let entries = match std::fs::read_dir(&path) {
        Ok(entries) => entries,
        Err(e) => return fail_errno(req, e.raw_os_error().unwrap_or(libc::EIO)),
    };

    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => names.push(entry.file_name()),
            Err(e) => return fail_errno(req, e.raw_os_error().unwrap_or(libc::EIO)),
        }
    }
    let count = names.len() as i64;
    req.payload2 = Some(Payload::DirEntries(names));
    req.result = count;
    req.errorno = None;
}
